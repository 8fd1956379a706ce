//! Schema-versioning engine and migration orchestrator.
//!
//! The engine is a capability interface (`clean` / `migrate`) so any
//! compliant implementation can stand in for tests. The production
//! implementation is a thin adapter over `sqlx::migrate`: version
//! ordering, checksums, the history table, and advisory locking all
//! stay inside sqlx.

pub mod config;
pub mod orchestrator;
pub mod postgres;

pub use config::{EngineConfig, EngineOverrides, TargetVersion};
pub use orchestrator::perform_migration;
pub use postgres::PgEngine;

use sqlshift_core::outcome::{CleanReport, MigrateReport};

/// Failure in the versioning engine or its configuration.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine configuration failed: {0}")]
    Configuration(String),

    #[error("Schema clean failed: {0}")]
    Clean(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Narrow contract onto the schema-versioning engine.
///
/// An engine is configured once per invocation against a schema, a
/// target version, a connection, and a staged scripts directory.
#[async_trait::async_trait]
pub trait VersioningEngine {
    /// Drop every object in the target schema. Destructive.
    async fn clean(&self) -> Result<CleanReport, EngineError>;

    /// Apply every pending migration up to the configured target, in
    /// ascending version order.
    async fn migrate(&self) -> Result<MigrateReport, EngineError>;
}
