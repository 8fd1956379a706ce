//! Migration orchestration.
//!
//! Sequences the configured engine through its phases: an optional
//! destructive clean, then the versioned migrate. Each phase fails
//! independently and failure is terminal — a clean failure must leave
//! the migrate step unexecuted, and nothing is retried or rolled back.

use sqlshift_core::outcome::MigrationOutcome;

use crate::{EngineError, VersioningEngine};

/// Run the clean/migrate sequence against a configured engine and
/// summarize the outcome.
pub async fn perform_migration<E>(
    engine: &E,
    do_clean: bool,
) -> Result<MigrationOutcome, EngineError>
where
    E: VersioningEngine + Sync + ?Sized,
{
    let clean = if do_clean {
        let report = engine.clean().await?;
        tracing::info!(
            schemas_cleaned = report.schemas_cleaned,
            warnings = report.warnings,
            database = %report.database,
            "schema clean completed"
        );
        Some(report)
    } else {
        None
    };

    let migrate = engine.migrate().await?;
    tracing::info!(
        migrations_applied = migrate.migrations_applied,
        warnings = migrate.warnings,
        database = %migrate.database,
        "migrate completed"
    );

    Ok(MigrationOutcome { clean, migrate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sqlshift_core::outcome::{CleanReport, MigrateReport};
    use std::sync::Mutex;

    /// Call-recording fake engine with scriptable failures.
    struct FakeEngine {
        calls: Mutex<Vec<&'static str>>,
        fail_clean: bool,
        fail_migrate: bool,
    }

    impl FakeEngine {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_clean: false,
                fail_migrate: false,
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl VersioningEngine for FakeEngine {
        async fn clean(&self) -> Result<CleanReport, EngineError> {
            self.calls.lock().unwrap().push("clean");
            if self.fail_clean {
                return Err(EngineError::Clean("simulated clean failure".into()));
            }
            Ok(CleanReport {
                schemas_cleaned: 1,
                warnings: 0,
                database: "app".into(),
            })
        }

        async fn migrate(&self) -> Result<MigrateReport, EngineError> {
            self.calls.lock().unwrap().push("migrate");
            if self.fail_migrate {
                return Err(EngineError::Migration("simulated migrate failure".into()));
            }
            Ok(MigrateReport {
                migrations_applied: 2,
                warnings: 0,
                database: "app".into(),
            })
        }
    }

    #[tokio::test]
    async fn without_clean_only_migrate_runs() {
        let engine = FakeEngine::new();
        let outcome = perform_migration(&engine, false).await.unwrap();

        assert_eq!(engine.calls(), vec!["migrate"]);
        assert!(outcome.clean.is_none());
        assert_eq!(outcome.migrate.migrations_applied, 2);
    }

    #[tokio::test]
    async fn with_clean_both_phases_run_in_order() {
        let engine = FakeEngine::new();
        let outcome = perform_migration(&engine, true).await.unwrap();

        assert_eq!(engine.calls(), vec!["clean", "migrate"]);
        assert_eq!(outcome.clean.unwrap().schemas_cleaned, 1);
    }

    #[tokio::test]
    async fn clean_failure_prevents_migrate() {
        let mut engine = FakeEngine::new();
        engine.fail_clean = true;

        let err = perform_migration(&engine, true).await.unwrap_err();

        assert_matches!(err, EngineError::Clean(_));
        assert_eq!(engine.calls(), vec!["clean"]);
    }

    #[tokio::test]
    async fn migrate_failure_surfaces_as_migration_error() {
        let mut engine = FakeEngine::new();
        engine.fail_migrate = true;

        let err = perform_migration(&engine, false).await.unwrap_err();
        assert_matches!(err, EngineError::Migration(_));
    }
}
