//! Engine configuration.
//!
//! Binds the target schema, the requested version, the assembled
//! connection string, the staged scripts directory, and the deployment
//! override variables. Carries no credentials, so it is safe to log.

use std::path::PathBuf;

use sqlshift_core::credentials::CredentialSet;

use crate::EngineError;

/// Sentinel meaning "most recent available migration".
pub const TARGET_LATEST: &str = "latest";

/// Override: maximum pool connections (default 2).
pub const ENV_MAX_CONNECTIONS: &str = "SQLSHIFT_MAX_CONNECTIONS";

/// Override: connection acquire timeout in seconds (default 30).
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "SQLSHIFT_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Target version
// ---------------------------------------------------------------------------

/// Requested migration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetVersion {
    /// Apply everything available.
    Latest,
    /// Apply up to and including this version.
    Version(i64),
}

impl TargetVersion {
    /// Parse the raw `target_version` parameter: the `latest` sentinel
    /// (any case) or a numeric version.
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        if raw.eq_ignore_ascii_case(TARGET_LATEST) {
            return Ok(Self::Latest);
        }
        raw.parse::<i64>()
            .map(Self::Version)
            .map_err(|_| {
                EngineError::Configuration(format!(
                    "Invalid target version '{raw}': expected a numeric version or '{TARGET_LATEST}'"
                ))
            })
    }

    /// Whether a migration version falls within this target.
    pub fn includes(&self, version: i64) -> bool {
        match self {
            Self::Latest => true,
            Self::Version(max) => version <= *max,
        }
    }
}

// ---------------------------------------------------------------------------
// Deployment overrides
// ---------------------------------------------------------------------------

/// Deployment-time tuning read from `SQLSHIFT_*` environment variables,
/// so pool behaviour can change without a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOverrides {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for EngineOverrides {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl EngineOverrides {
    /// Read overrides from the process environment. Unset variables fall
    /// back to defaults; malformed values are a configuration error.
    pub fn from_env() -> Result<Self, EngineError> {
        Ok(Self {
            max_connections: parse_override(
                ENV_MAX_CONNECTIONS,
                std::env::var(ENV_MAX_CONNECTIONS).ok().as_deref(),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            connect_timeout_secs: parse_override(
                ENV_CONNECT_TIMEOUT_SECS,
                std::env::var(ENV_CONNECT_TIMEOUT_SECS).ok().as_deref(),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        })
    }
}

fn parse_override<T: std::str::FromStr>(
    name: &str,
    raw: Option<&str>,
    default: T,
) -> Result<T, EngineError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            EngineError::Configuration(format!("{name} must be a valid number, got '{value}'"))
        }),
    }
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

/// Fully resolved engine configuration for one invocation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub schema: String,
    pub database_name: String,
    pub target: TargetVersion,
    /// `postgres://host:port/database`, without credentials.
    pub database_url: String,
    pub scripts_dir: PathBuf,
    pub overrides: EngineOverrides,
}

impl EngineConfig {
    /// Assemble a configuration from resolved parameters and credentials.
    ///
    /// Fails before any database contact on a malformed target version
    /// or a non-numeric port.
    pub fn new(
        schema: &str,
        database_name: &str,
        target_version: &str,
        scripts_dir: PathBuf,
        credentials: &CredentialSet,
    ) -> Result<Self, EngineError> {
        let target = TargetVersion::parse(target_version)?;

        let port: u16 = credentials.port.parse().map_err(|_| {
            EngineError::Configuration(format!(
                "Invalid port '{}': expected a number in 1-65535",
                credentials.port
            ))
        })?;

        let database_url = format!(
            "postgres://{}:{}/{}",
            credentials.host, port, database_name
        );

        Ok(Self {
            schema: schema.to_string(),
            database_name: database_name.to_string(),
            target,
            database_url,
            scripts_dir,
            overrides: EngineOverrides::from_env()?,
        })
    }
}
