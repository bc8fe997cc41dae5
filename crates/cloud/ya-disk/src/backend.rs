//! Storage operations consumed by the upload pipeline. [`crate::YaDiskClient`] is the production
//! implementation; tests substitute in-memory backends.

use async_trait::async_trait;
use bytes::Bytes;
use loader_core::{ByteStream, StorageError};

#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Returns false when the backend rejects `token`; transport failures are errors.
    async fn check_token(&self, token: &str) -> Result<bool, StorageError>;

    async fn is_dir(&self, path: &str) -> Result<bool, StorageError>;

    async fn mkdir(&self, path: &str) -> Result<(), StorageError>;

    /// Uploads a whole buffer to `path`. Fails with a conflict if `path` exists or is locked.
    async fn upload_buffer(&self, bytes: Bytes, path: &str) -> Result<(), StorageError>;

    /// Reserves `path` and returns the URL the bytes must be sent to.
    async fn request_upload_link(&self, path: &str) -> Result<String, StorageError>;

    /// Streams `chunks` to a link obtained from [`RemoteStorage::request_upload_link`].
    async fn upload_by_link(&self, chunks: ByteStream, url: &str) -> Result<(), StorageError>;

    /// Releases the connection. Must be safe to call more than once.
    async fn close(&self);
}
