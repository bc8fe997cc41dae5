//! Token check wrapped around privileged storage calls.

use std::future::Future;
use std::sync::Arc;

use loader_core::StorageError;
use tracing::warn;

use crate::backend::RemoteStorage;

/// Validates the token against the backend before every guarded operation. Nothing is cached.
#[derive(Clone)]
pub struct TokenGate {
    backend: Arc<dyn RemoteStorage>,
    token: String,
}

impl TokenGate {
    pub fn new(backend: Arc<dyn RemoteStorage>, token: impl Into<String>) -> Self {
        Self {
            backend,
            token: token.into(),
        }
    }

    /// Runs `operation` only if the token check passes.
    ///
    /// A rejected token yields [`StorageError::TokenInvalid`] without invoking `operation`; a
    /// failing check call propagates its own error unchanged.
    pub async fn guard<T, F, Fut>(&self, operation: F) -> Result<T, StorageError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        if !self.backend.check_token(&self.token).await? {
            warn!("Storage token rejected");
            return Err(StorageError::TokenInvalid);
        }
        operation().await
    }
}
