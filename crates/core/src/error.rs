/// Failure while resolving invocation parameters.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("event must have {name} field")]
    MissingParameter { name: String },
}

/// Failure while extracting credentials from a secret payload.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Malformed secret payload: {0}")]
    Payload(String),

    #[error("Secret payload is missing field '{name}'")]
    MissingField { name: String },
}
