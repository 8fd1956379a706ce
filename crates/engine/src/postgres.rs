//! Production versioning engine backed by `sqlx::migrate`.
//!
//! The adapter loads the staged scripts into a `Migrator`, trims the
//! migration set to the requested target, and delegates execution.
//! Checksum validation, the `_sqlx_migrations` history table, and the
//! advisory lock guarding concurrent runs are all sqlx's.

use std::collections::HashSet;
use std::time::Duration;

use sqlx::migrate::{Migrate, MigrationType, Migrator};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use sqlshift_core::credentials::CredentialSet;
use sqlshift_core::outcome::{CleanReport, MigrateReport};

use crate::config::{EngineConfig, TargetVersion};
use crate::{EngineError, VersioningEngine};

/// Versioning engine bound to one schema, target, and script set.
pub struct PgEngine {
    pool: PgPool,
    migrator: Migrator,
    schema: String,
    database: String,
}

impl PgEngine {
    /// Configure the engine: load the staged scripts, trim them to the
    /// target version, and prepare a lazy connection pool.
    ///
    /// No database contact happens here; connection faults surface from
    /// `clean` or `migrate`, matching their failure kinds.
    pub async fn configure(
        config: &EngineConfig,
        credentials: &CredentialSet,
    ) -> Result<Self, EngineError> {
        let options: PgConnectOptions = config.database_url.parse().map_err(|err| {
            EngineError::Configuration(format!(
                "Invalid connection string '{}': {err}",
                config.database_url
            ))
        })?;
        let options = options
            .username(&credentials.username)
            .password(&credentials.password)
            // Unqualified DDL in the scripts lands in the target schema.
            .options([("search_path", config.schema.as_str())]);

        let pool = PgPoolOptions::new()
            .max_connections(config.overrides.max_connections)
            .acquire_timeout(Duration::from_secs(config.overrides.connect_timeout_secs))
            .connect_lazy_with(options);

        let mut migrator = Migrator::new(config.scripts_dir.as_path())
            .await
            .map_err(|err| {
                EngineError::Configuration(format!(
                    "Failed to load migration scripts from {}: {err}",
                    config.scripts_dir.display()
                ))
            })?;
        apply_target(&mut migrator, config.target);

        Ok(Self {
            pool,
            migrator,
            schema: config.schema.clone(),
            database: config.database_name.clone(),
        })
    }
}

/// Trim a migrator's script set to the requested target version.
fn apply_target(migrator: &mut Migrator, target: TargetVersion) {
    if let TargetVersion::Version(_) = target {
        migrator
            .migrations
            .to_mut()
            .retain(|m| target.includes(m.version));
    }
}

#[async_trait::async_trait]
impl VersioningEngine for PgEngine {
    async fn clean(&self) -> Result<CleanReport, EngineError> {
        let schema = quote_ident(&self.schema);
        let map_err = |err: sqlx::Error| EngineError::Clean(err.to_string());

        sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        Ok(CleanReport {
            schemas_cleaned: 1,
            warnings: 0,
            database: self.database.clone(),
        })
    }

    async fn migrate(&self) -> Result<MigrateReport, EngineError> {
        let map_err = |err: String| EngineError::Migration(err);

        // The schema must exist before the history table can be created
        // in it (a fresh database, or a clean-less first run).
        sqlx::query(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            quote_ident(&self.schema)
        ))
        .execute(&self.pool)
        .await
        .map_err(|err| map_err(err.to_string()))?;

        // Count what is pending before delegating, since the migrator
        // reports nothing back on success.
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|err| map_err(err.to_string()))?;
        conn.ensure_migrations_table()
            .await
            .map_err(|err| map_err(err.to_string()))?;
        let applied: HashSet<i64> = conn
            .list_applied_migrations()
            .await
            .map_err(|err| map_err(err.to_string()))?
            .iter()
            .map(|m| m.version)
            .collect();
        drop(conn);

        let pending = self
            .migrator
            .iter()
            .filter(|m| {
                !matches!(m.migration_type, MigrationType::ReversibleDown)
                    && !applied.contains(&m.version)
            })
            .count();

        self.migrator
            .run(&self.pool)
            .await
            .map_err(|err| map_err(err.to_string()))?;

        Ok(MigrateReport {
            migrations_applied: pending,
            warnings: 0,
            database: self.database.clone(),
        })
    }
}

/// Quote a Postgres identifier, doubling embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
