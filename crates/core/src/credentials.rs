//! Database credential extraction from a secret payload.
//!
//! The secret store returns an opaque string payload. This module parses
//! it as a flat JSON object of string fields and pulls out host, port,
//! username, and password using caller-configured field names.

use std::fmt;

use crate::error::CredentialError;

/// Secret field names for each credential, configurable per invocation
/// to support secrets with non-default key naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: String,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            username: "username".into(),
            password: "password".into(),
            host: "host".into(),
            port: "port".into(),
        }
    }
}

/// Resolved database credentials.
///
/// Held in memory for the duration of one invocation only. The `Debug`
/// impl redacts the password so the set can never leak through logging.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialSet {
    /// Extract credentials from the secret's JSON payload.
    ///
    /// Fails with [`CredentialError::MissingField`] naming the first
    /// configured key absent from the payload, or
    /// [`CredentialError::Payload`] when the payload is not a flat JSON
    /// object of strings.
    pub fn from_payload(payload: &str, keys: &KeyMap) -> Result<Self, CredentialError> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|err| CredentialError::Payload(err.to_string()))?;

        let fields = value.as_object().ok_or_else(|| {
            CredentialError::Payload("secret payload must be a JSON object".into())
        })?;

        Ok(Self {
            host: string_field(fields, &keys.host)?,
            port: string_field(fields, &keys.port)?,
            username: string_field(fields, &keys.username)?,
            password: string_field(fields, &keys.password)?,
        })
    }
}

fn string_field(
    fields: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<String, CredentialError> {
    match fields.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CredentialError::Payload(format!(
            "secret field '{key}' must be a JSON string"
        ))),
        None => Err(CredentialError::MissingField {
            name: key.to_string(),
        }),
    }
}
