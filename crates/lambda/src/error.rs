use sqlshift_cloud::{RegionError, SecretError, StageError};
use sqlshift_core::error::{CredentialError, ParamError};
use sqlshift_engine::EngineError;

/// Top-level invocation failure.
///
/// Every component failure is fatal to the invocation and propagates to
/// the runtime unchanged in kind; nothing is retried here.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
