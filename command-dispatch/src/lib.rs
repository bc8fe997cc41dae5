//! # Command dispatch
//!
//! Routes one inbound chat event to a handler and turns the handler's output into a reply.
//! Documents go to the single document handler; text goes to an exact `/command` match first and
//! then to the regex rules. The registry keeps the platform's command menu in sync.

pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::{
    failure_reply, EventDispatcher, Reply, DOC_INVALID_MSG, ERROR_MSG, FAILURE_MSG, RENAME_MSG,
    SUCCESS_MSG, TOKEN_INVALID_MSG, UNKNOWN_COMMAND_MSG,
};
pub use handler::{handler_fn, CommandHandler, DocumentHandler, FnHandler};
pub use registry::{Command, CommandRegistry, COMMAND_PREFIX};
