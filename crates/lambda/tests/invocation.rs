//! End-to-end invocation scenarios with in-memory collaborators.
//!
//! Exercises the same sequence the handler drives — parameter
//! resolution, script staging, credential extraction, orchestration —
//! with a fake object store and a fake versioning engine standing in
//! for S3 and Postgres.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use assert_matches::assert_matches;
use async_trait::async_trait;

use sqlshift_cloud::{stage, ObjectStore, StorageError};
use sqlshift_core::credentials::CredentialSet;
use sqlshift_core::error::{CredentialError, ParamError};
use sqlshift_core::outcome::{CleanReport, MigrateReport};
use sqlshift_core::params::ResolvedParams;
use sqlshift_engine::{perform_migration, EngineError, VersioningEngine};
use sqlshift_lambda::SUCCESS_RESPONSE;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct MemoryStore {
    objects: Vec<(String, Vec<u8>)>,
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_keys(&self, _bucket: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.objects.iter().map(|(k, _)| k.clone()).collect())
    }

    async fn download(&self, _bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError> {
        let content = &self
            .objects
            .iter()
            .find(|(k, _)| k == key)
            .expect("listed key must exist")
            .1;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: dest.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(dest, content).map_err(|source| StorageError::Write {
            path: dest.to_path_buf(),
            source,
        })
    }
}

#[derive(Default)]
struct FakeEngine {
    calls: Mutex<Vec<&'static str>>,
    staged_migrations: usize,
}

#[async_trait]
impl VersioningEngine for FakeEngine {
    async fn clean(&self) -> Result<CleanReport, EngineError> {
        self.calls.lock().unwrap().push("clean");
        Ok(CleanReport {
            schemas_cleaned: 1,
            warnings: 0,
            database: "app".into(),
        })
    }

    async fn migrate(&self) -> Result<MigrateReport, EngineError> {
        self.calls.lock().unwrap().push("migrate");
        Ok(MigrateReport {
            migrations_applied: self.staged_migrations,
            warnings: 0,
            database: "app".into(),
        })
    }
}

fn base_event() -> HashMap<String, String> {
    [
        ("bucket_name", "scripts"),
        ("secret_name", "db-secret"),
        ("database_name", "app"),
        ("schema_name", "public"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// ---------------------------------------------------------------------------
// Scenario: fresh database, two scripts, no clean
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_scripts_no_clean_applies_two_migrations() {
    let params = ResolvedParams::from_event(&base_event()).unwrap();
    assert!(!params.do_clean);

    let store = MemoryStore {
        objects: vec![
            ("1_create_users.sql".into(), b"CREATE TABLE users (id int);".to_vec()),
            ("2_create_posts.sql".into(), b"CREATE TABLE posts (id int);".to_vec()),
        ],
    };
    let tmp = tempfile::tempdir().unwrap();
    let staged = stage(&store, &params.bucket_name, tmp.path()).await.unwrap();
    assert_eq!(staged.files, 2);

    let payload = r#"{"username":"u","password":"p","host":"db","port":"5432"}"#;
    let credentials = CredentialSet::from_payload(payload, &params.key_map).unwrap();
    assert_eq!(credentials.username, "u");

    let engine = FakeEngine {
        staged_migrations: staged.files,
        ..FakeEngine::default()
    };
    let outcome = perform_migration(&engine, params.do_clean).await.unwrap();

    assert_eq!(*engine.calls.lock().unwrap(), vec!["migrate"]);
    assert!(outcome.clean.is_none());
    assert_eq!(outcome.migrate.migrations_applied, 2);
    assert_eq!(SUCCESS_RESPONSE, "200 OK");
}

// ---------------------------------------------------------------------------
// Scenario: clean requested
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clean_request_runs_both_phases() {
    let mut event = base_event();
    event.insert("do_clean".into(), "true".into());
    let params = ResolvedParams::from_event(&event).unwrap();

    let engine = FakeEngine {
        staged_migrations: 1,
        ..FakeEngine::default()
    };
    let outcome = perform_migration(&engine, params.do_clean).await.unwrap();

    assert_eq!(*engine.calls.lock().unwrap(), vec!["clean", "migrate"]);
    assert_eq!(outcome.clean.unwrap().schemas_cleaned, 1);
}

// ---------------------------------------------------------------------------
// Scenario: failures short-circuit before later steps
// ---------------------------------------------------------------------------

#[test]
fn missing_required_parameter_fails_before_any_collaborator() {
    let mut event = base_event();
    event.remove("schema_name");

    let err = ResolvedParams::from_event(&event).unwrap_err();
    assert_matches!(err, ParamError::MissingParameter { name } if name == "schema_name");
}

#[test]
fn missing_secret_field_fails_before_the_engine_is_configured() {
    let params = ResolvedParams::from_event(&base_event()).unwrap();
    let payload = r#"{"username":"u","password":"p","host":"db"}"#;

    let err = CredentialSet::from_payload(payload, &params.key_map).unwrap_err();
    assert_matches!(err, CredentialError::MissingField { name } if name == "port");
}
