//! Migration-script staging.
//!
//! Each invocation gets a fresh local directory populated with every
//! object in the scripts bucket, preserving object keys as relative
//! paths. The first list or download failure aborts the whole step so
//! the orchestrator never runs against an incomplete script set.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::store::{ObjectStore, StorageError};

/// Failure preparing or populating the staging directory.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("Failed to create staging directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A populated staging directory.
#[derive(Debug, Clone)]
pub struct StagedScripts {
    pub dir: PathBuf,
    pub files: usize,
}

/// Unique staging path for one invocation.
///
/// The millisecond timestamp keeps concurrent invocations in the same
/// execution environment from colliding. The directory is never deleted
/// by this system; its lifetime ends with the ephemeral environment.
pub fn staging_dir() -> PathBuf {
    PathBuf::from(format!("/tmp/sql_scripts_{}", Utc::now().timestamp_millis()))
}

/// Copy every object in `bucket` into `dest`.
///
/// The directory is created before any network call; creation failure
/// aborts the invocation. Keys ending in `/` (folder placeholders) are
/// skipped.
pub async fn stage(
    store: &impl ObjectStore,
    bucket: &str,
    dest: &Path,
) -> Result<StagedScripts, StageError> {
    std::fs::create_dir_all(dest).map_err(|source| StageError::CreateDir {
        path: dest.to_path_buf(),
        source,
    })?;

    let keys = store.list_keys(bucket).await?;

    let mut files = 0;
    for key in &keys {
        if key.ends_with('/') {
            tracing::debug!(key = %key, "skipping folder placeholder");
            continue;
        }
        let local = dest.join(key);
        tracing::debug!(key = %key, path = %local.display(), "downloading migration script");
        store.download(bucket, key, &local).await?;
        files += 1;
    }

    Ok(StagedScripts {
        dir: dest.to_path_buf(),
        files,
    })
}
