//! AWS collaborators for the schema-migration runner.
//!
//! Region resolution, the object-store and secret-store seams with their
//! S3 / Secrets Manager implementations, and the script stager that
//! copies a bucket into the invocation's local staging directory.
//!
//! Clients are plain per-invocation values; nothing in this crate holds
//! global state.

pub mod region;
pub mod secrets;
pub mod stager;
pub mod store;

pub use region::{region_from_env, RegionError};
pub use secrets::{SecretError, SecretStore, SecretsManagerStore};
pub use stager::{stage, staging_dir, StageError, StagedScripts};
pub use store::{ObjectStore, S3Store, StorageError};
