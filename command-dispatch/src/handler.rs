//! Handler traits for commands and documents.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use loader_core::{CommandOutput, Document, HandlerError};

/// Handles a command. `args` are the whitespace-delimited tokens after the first one.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn call(&self, args: Vec<String>) -> Result<CommandOutput, HandlerError>;
}

/// Adapts an async closure into a [`CommandHandler`].
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CommandOutput, HandlerError>> + Send,
{
    async fn call(&self, args: Vec<String>) -> Result<CommandOutput, HandlerError> {
        (self.0)(args).await
    }
}

/// Wraps `f` as a shareable handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn CommandHandler>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CommandOutput, HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// The single handler for binary attachments. Documents of any other media type are rejected by
/// the dispatcher before this handler is invoked.
#[async_trait]
pub trait DocumentHandler: Send + Sync {
    fn accepted_mime_type(&self) -> &str;

    async fn handle(&self, document: &Document) -> Result<CommandOutput, HandlerError>;
}
