use thiserror::Error;

/// Why the storage backend refused a path. Both kinds are worth retrying under a new name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    PathExists,
    Locked,
}

/// Errors from the remote storage backend and the upload pipeline.
///
/// Only [`StorageError::Conflict`] is recoverable; every other variant is fatal for the attempted
/// operation and must propagate unchanged.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Path conflict ({kind:?}): {path}")]
    Conflict { kind: ConflictKind, path: String },

    #[error("The Yandex disk token failed verification, update token.")]
    TokenInvalid,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Please rename upload file {name}: gave up after {attempts} attempts")]
    Exhausted { name: String, attempts: u32 },
}

impl StorageError {
    pub fn path_exists(path: impl Into<String>) -> Self {
        Self::Conflict {
            kind: ConflictKind::PathExists,
            path: path.into(),
        }
    }

    pub fn locked(path: impl Into<String>) -> Self {
        Self::Conflict {
            kind: ConflictKind::Locked,
            path: path.into(),
        }
    }

    /// True for the naming/lock conflicts that a different candidate path may resolve.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Errors returned by command and document handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Connectivity-class failures are answered with a "try again later" reply by the dispatcher.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Connectivity(_) | Self::Storage(StorageError::Transport(_))
        )
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Invalid regex rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
