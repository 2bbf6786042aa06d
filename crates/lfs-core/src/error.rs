//! Error types for git-lfs command operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used by
//! both workspace crates. Uses `thiserror` for derive macros.

use thiserror::Error;

/// Errors that can occur while assembling or running the command tree.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Completion requested for a shell we cannot generate scripts for.
    #[error("unsupported shell {0:?}: expected one of bash, zsh, fish, powershell")]
    UnsupportedShell(String),

    /// Builders registered new commands while the registry was being realized.
    #[error(
        "{count} command(s) registered during realization; \
         nested registration is not supported"
    )]
    NestedRegistration {
        /// Number of rejected registrations.
        count: usize,
    },

    /// The registry was realized more than once.
    #[error("command registry has already been realized")]
    AlreadyRealized,

    /// Command line could not be parsed against the command tree.
    #[error("{0}")]
    Usage(String),

    /// A subcommand's run function failed.
    #[error("{0}")]
    Command(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create a command failure.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
