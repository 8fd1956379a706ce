//! Secret-store seam and its Secrets Manager implementation.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};

/// The secret store rejected the request (not found, access denied, or
/// transient fault). Never retried at this layer.
#[derive(Debug, thiserror::Error)]
#[error("Problem getting secret '{name}': {message}")]
pub struct SecretError {
    pub name: String,
    pub message: String,
}

/// Access to a named secret's opaque string payload.
#[async_trait]
pub trait SecretStore {
    async fn get_secret_value(&self, name: &str) -> Result<String, SecretError>;
}

/// Secrets Manager-backed secret store.
///
/// Construct inside a narrow scope and let it drop after the single
/// fetch; the underlying connection is released with the client.
pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
    /// Build a client for the given region.
    pub async fn new(region: Region) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        Self {
            client: aws_sdk_secretsmanager::Client::new(&config),
        }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn get_secret_value(&self, name: &str) -> Result<String, SecretError> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|err| SecretError {
                name: name.to_string(),
                message: err.to_string(),
            })?;

        response
            .secret_string()
            .map(str::to_owned)
            .ok_or_else(|| SecretError {
                name: name.to_string(),
                message: "secret has no string payload".into(),
            })
    }
}
