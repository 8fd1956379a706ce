//! Invocation outcome summary.
//!
//! Counts reported by the versioning engine for each phase. The summary
//! is written to the log sink; the caller only ever sees a fixed success
//! status.

/// Result of a destructive schema clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub schemas_cleaned: usize,
    pub warnings: usize,
    /// Database identifier reported by the engine.
    pub database: String,
}

/// Result of a versioned migrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateReport {
    pub migrations_applied: usize,
    pub warnings: usize,
    pub database: String,
}

/// Summary of one complete invocation: the optional clean phase followed
/// by the migrate phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Present only when the invocation requested a clean.
    pub clean: Option<CleanReport>,
    pub migrate: MigrateReport,
}

impl MigrationOutcome {
    /// Database identifier the migrate phase ran against.
    pub fn database(&self) -> &str {
        &self.migrate.database
    }
}
