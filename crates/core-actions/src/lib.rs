//! Modal command engine.
//!
//! [`Engine`] owns the editor state, the document and the screen, and exposes
//! the entry points the host drives: [`Engine::handle_key_event`],
//! [`Engine::handle_tick`], [`Engine::handle_load`] and
//! [`Engine::handle_resize`], plus [`Engine::stop_requested`].
//!
//! Key handling is table driven ([`keymap::KeyTable`]) and routed by mode in
//! [`dispatcher`].

pub mod dispatcher;
pub mod engine;
pub mod keymap;

pub use dispatcher::EditContext;
pub use dispatcher::command_parser::{CommandParser, ExCommand};
pub use dispatcher::motion::{ColumnReach, Motion};
pub use engine::Engine;
pub use keymap::{Binding, HandlerId, KeyTable};

use core_state::Severity;
use core_text::DocumentError;
use thiserror::Error;

/// Everything a key can fail with. User mistakes and IO failures end up on the status
/// line; invariant violations are bugs and are also logged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0} not implemented")]
    NotImplemented(String),
    /// A pending operator received a key that cannot complete it.
    #[error("invalid command")]
    InvalidCommand,
    #[error("not an editor command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("failed to save file!")]
    SaveFailed(#[source] DocumentError),
    #[error("internal error: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    pub fn severity(&self) -> Severity {
        match self {
            EngineError::NotImplemented(_) | EngineError::InvalidCommand => Severity::Warning,
            EngineError::UnknownCommand(_)
            | EngineError::Document(_)
            | EngineError::SaveFailed(_)
            | EngineError::InvariantViolation(_) => Severity::Error,
        }
    }
}
