//! Object-store seam and its S3 implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};

/// Failure listing or downloading migration scripts.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to list objects in bucket '{bucket}': {message}")]
    List { bucket: String, message: String },

    #[error("Failed to download object '{key}' from bucket '{bucket}': {message}")]
    Download {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Failed to write staged file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read access to a bucket of migration scripts.
///
/// The production implementation is [`S3Store`]; tests substitute an
/// in-memory store.
#[async_trait]
pub trait ObjectStore {
    /// List every object key in the bucket, in no particular order.
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, StorageError>;

    /// Download one object to a local path, creating parent directories.
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError>;
}

/// S3-backed object store.
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Build a client for the given region.
    pub async fn new(region: Region) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, StorageError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| StorageError::List {
                bucket: bucket.to_string(),
                message: err.to_string(),
            })?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }

    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| StorageError::Download {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: err.to_string(),
            })?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|err| StorageError::Download {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: err.to_string(),
            })?
            .into_bytes();

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Write {
                    path: dest.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(dest, &body)
            .await
            .map_err(|source| StorageError::Write {
                path: dest.to_path_buf(),
                source,
            })
    }
}
