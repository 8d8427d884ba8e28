//! Error types for dishdesk-tui.

use std::io;

use dishdesk_core::error::{StorageError, TableError};
use thiserror::Error;

/// TUI-specific error type.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal I/O error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] StorageError),

    /// A table could not be set up.
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Result type alias for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;
