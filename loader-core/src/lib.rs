//! # loader-core
//!
//! Core types shared by the data loader crates: [`InboundEvent`], [`CommandOutput`], the
//! [`ChatPlatform`] reply abstraction, the error taxonomy, and tracing initialization.
//! Transport-agnostic; used by command-dispatch, ya-disk and the data-loader application.

pub mod error;
pub mod logger;
pub mod platform;
pub mod types;

pub use error::{ConflictKind, DispatchError, HandlerError, Result, StorageError};
pub use logger::init_tracing;
pub use platform::ChatPlatform;
pub use types::{
    ByteStream, Chat, CommandOutput, CommandSpec, Document, DocumentSource, EventKind,
    InboundEvent, OutgoingFile, User,
};
