//! Upload pipeline: name resolution + token gate + bounded retry on path conflicts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use loader_core::{DocumentSource, StorageError};
use tracing::{info, instrument, warn};

use crate::backend::RemoteStorage;
use crate::config::YaDiskConfig;
use crate::gate::TokenGate;
use crate::name::UploadTarget;

/// Bytes to upload: a complete buffer (HTTP upload) or a re-openable chunked stream (chat attachment).
#[derive(Clone)]
pub enum UploadSource {
    Buffer(Bytes),
    Stream(Arc<dyn DocumentSource>),
}

/// Owns the storage connection for the process and pushes files to the configured directory.
pub struct UploadPipeline {
    backend: Arc<dyn RemoteStorage>,
    gate: TokenGate,
    dir: String,
    max_attempts: u32,
    closed: AtomicBool,
}

impl UploadPipeline {
    pub fn new(backend: Arc<dyn RemoteStorage>, config: &YaDiskConfig) -> Self {
        Self {
            gate: TokenGate::new(backend.clone(), config.token.clone()),
            backend,
            dir: config.dir.clone(),
            max_attempts: config.attempt_count,
            closed: AtomicBool::new(false),
        }
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Verifies the token and creates the upload directory if it does not exist yet.
    #[instrument(skip(self), fields(dir = %self.dir))]
    pub async fn connect(&self) -> Result<(), StorageError> {
        self.gate
            .guard(|| async {
                if !self.backend.is_dir(&self.dir).await? {
                    info!(dir = %self.dir, "Creating upload directory");
                    self.backend.mkdir(&self.dir).await?;
                }
                Ok(())
            })
            .await?;
        info!("Storage client connected");
        Ok(())
    }

    /// Closes the backend once. Later calls, or calls without a successful `connect`, are no-ops
    /// beyond the first close.
    pub async fn disconnect(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.backend.close().await;
        info!("Storage client disconnected");
    }

    /// Uploads `source` as `logical_name`, renaming on conflicts. Returns the remote path written.
    ///
    /// Path-exists and locked errors move on to the next candidate name; after `max_attempts`
    /// candidates the upload fails with [`StorageError::Exhausted`]. Any other error propagates
    /// from the attempt that raised it.
    #[instrument(skip(self, source), fields(file = %logical_name))]
    pub async fn upload(
        &self,
        source: &UploadSource,
        logical_name: &str,
    ) -> Result<String, StorageError> {
        for attempt in 0..self.max_attempts {
            let path = UploadTarget::new(logical_name, attempt).path(&self.dir);
            match self.gate.guard(|| self.write(source, &path)).await {
                Ok(()) => {
                    info!(path = %path, attempt, "File uploaded");
                    return Ok(path);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(path = %path, attempt, error = %e, "Upload target unavailable, renaming");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::Exhausted {
            name: logical_name.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn write(&self, source: &UploadSource, path: &str) -> Result<(), StorageError> {
        match source {
            UploadSource::Buffer(bytes) => self.backend.upload_buffer(bytes.clone(), path).await,
            UploadSource::Stream(document) => {
                let url = self.backend.request_upload_link(path).await?;
                let chunks = document.open().await?;
                self.backend.upload_by_link(chunks, &url).await
            }
        }
    }
}
