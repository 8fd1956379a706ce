//! Invocation parameter resolution.
//!
//! The invocation event is a flat string-keyed map. Required keys fail
//! the invocation before any cloud client is constructed; optional keys
//! fall back to documented defaults.

use std::collections::HashMap;

use crate::credentials::KeyMap;
use crate::error::ParamError;

// ---------------------------------------------------------------------------
// Parameter names
// ---------------------------------------------------------------------------

/// Required: bucket holding the migration scripts.
pub const PARAM_BUCKET_NAME: &str = "bucket_name";

/// Required: name of the secret holding database credentials.
pub const PARAM_SECRET_NAME: &str = "secret_name";

/// Required: target database name.
pub const PARAM_DATABASE_NAME: &str = "database_name";

/// Required: target schema name.
pub const PARAM_SCHEMA_NAME: &str = "schema_name";

/// Optional: secret field holding the username (default `username`).
pub const PARAM_USERNAME_KEY: &str = "username_key";

/// Optional: secret field holding the password (default `password`).
pub const PARAM_PASSWORD_KEY: &str = "password_key";

/// Optional: secret field holding the host (default `host`).
pub const PARAM_HOST_KEY: &str = "host_key";

/// Optional: secret field holding the port (default `port`).
pub const PARAM_PORT_KEY: &str = "port_key";

/// Optional: version to migrate up to (default `latest`).
pub const PARAM_TARGET_VERSION: &str = "target_version";

/// Optional: whether to wipe the schema before migrating (default `false`).
pub const PARAM_DO_CLEAN: &str = "do_clean";

/// Default target version sentinel: apply every available migration.
pub const DEFAULT_TARGET_VERSION: &str = "latest";

// ---------------------------------------------------------------------------
// Resolved parameters
// ---------------------------------------------------------------------------

/// Invocation parameters after defaulting and validation.
#[derive(Debug, Clone)]
pub struct ResolvedParams {
    pub bucket_name: String,
    pub secret_name: String,
    pub database_name: String,
    pub schema_name: String,
    pub key_map: KeyMap,
    pub target_version: String,
    pub do_clean: bool,
}

impl ResolvedParams {
    /// Resolve parameters from the raw invocation event.
    ///
    /// Pure function over the map: no defaults are read from the
    /// environment and no external call is made here.
    pub fn from_event(event: &HashMap<String, String>) -> Result<Self, ParamError> {
        let bucket_name = required(event, PARAM_BUCKET_NAME)?;
        let secret_name = required(event, PARAM_SECRET_NAME)?;
        let database_name = required(event, PARAM_DATABASE_NAME)?;
        let schema_name = required(event, PARAM_SCHEMA_NAME)?;

        let defaults = KeyMap::default();
        let key_map = KeyMap {
            username: optional(event, PARAM_USERNAME_KEY, &defaults.username),
            password: optional(event, PARAM_PASSWORD_KEY, &defaults.password),
            host: optional(event, PARAM_HOST_KEY, &defaults.host),
            port: optional(event, PARAM_PORT_KEY, &defaults.port),
        };

        let target_version = optional(event, PARAM_TARGET_VERSION, DEFAULT_TARGET_VERSION);
        let do_clean = parse_bool_lenient(&optional(event, PARAM_DO_CLEAN, "false"));

        Ok(Self {
            bucket_name,
            secret_name,
            database_name,
            schema_name,
            key_map,
            target_version,
            do_clean,
        })
    }
}

fn required(event: &HashMap<String, String>, name: &str) -> Result<String, ParamError> {
    event
        .get(name)
        .cloned()
        .ok_or_else(|| ParamError::MissingParameter {
            name: name.to_string(),
        })
}

fn optional(event: &HashMap<String, String>, name: &str, default: &str) -> String {
    event
        .get(name)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Lenient boolean parse: the literal `true` (any case) is true,
/// anything else is false. Malformed values are not an error.
fn parse_bool_lenient(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
