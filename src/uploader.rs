//! Upload dispatcher for rotated log files
//!
//! Each rotated file is read once, put into the object store under a dated
//! key, and deleted locally on success. On any failure the file is left in
//! place and an operator re-triggers the upload by hand; there is no retry
//! queue. Uploads for different files run as independent tasks with no
//! ordering between them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, instrument};

use crate::rotation::random_suffix;
use crate::store::{ObjectStore, StoreResult};

/// Moves rotated files into the object store
#[derive(Clone)]
pub struct UploadDispatcher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    folder: String,
}

impl UploadDispatcher {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: String, folder: String) -> Self {
        Self {
            store,
            bucket,
            folder,
        }
    }

    /// Hand a rotated file to a freshly spawned upload task
    ///
    /// Never blocks the caller; the flush cycle must not wait on the network.
    pub fn dispatch(&self, path: PathBuf) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            if let Err(e) = dispatcher.upload(&path).await {
                error!("upload of {} failed, file left in place: {e}", path.display());
            }
        });
    }

    /// Upload one rotated file and delete it locally on success
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn upload(&self, path: &Path) -> StoreResult<String> {
        let body = tokio::fs::read(path).await?;
        let key = destination_key(&self.folder, Utc::now());

        debug!("uploading {} bytes to {}/{key}", body.len(), self.bucket);
        self.store.put(&self.bucket, &key, body).await?;

        tokio::fs::remove_file(path).await?;
        debug!("upload complete, removed {}", path.display());

        Ok(key)
    }
}

/// Destination key for a rotated file: a UTC day folder, an ISO-like UTC
/// timestamp, and a random suffix so concurrent rotations within the same
/// second cannot collide.
pub fn destination_key(folder: &str, now: DateTime<Utc>) -> String {
    let day = now.format("%Y-%m-%d");
    let timestamp = now.format("%Y-%m-%dT%H:%M:%S%.3fZ");
    format!("{folder}/{day}/{timestamp}_{}.txt", random_suffix())
}
