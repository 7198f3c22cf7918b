//! Error Types
//!
//! Engine errors never end the session: command failures become Error
//! blocks and clipboard failures become notices. These types exist so the
//! edges (shell spawning, clipboard access) can report precisely before the
//! controller turns them into block content.

use thiserror::Error;

/// Errors from running a shell command
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The shell process could not be started
    #[error("failed to start {shell}: {source}")]
    Spawn {
        /// Shell that was invoked
        shell: String,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// A stdio pipe was not available after spawning
    #[error("child process has no {0} pipe")]
    MissingPipe(&'static str),

    /// Reading output or waiting for exit failed
    #[error("i/o error while running command: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the system clipboard
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard could be opened
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard rejected the text
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}
