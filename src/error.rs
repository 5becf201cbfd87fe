//! Error types for the SSH shell client

use serde::Serialize;
use thiserror::Error;

/// Main error type for shell command execution
#[derive(Debug, Error)]
pub enum ShellError {
    /// The command to send is empty or whitespace
    #[error("command is blank!")]
    BlankCommand,

    /// `su root` was requested without a command or without a password
    #[error("command or root password is blank!")]
    BlankElevation,

    /// A batch was requested with no commands at all
    #[error("commands is blank!")]
    EmptyBatch,

    /// A batch contains an empty or whitespace entry
    #[error("Blank value in the commands array at index {0}!")]
    BlankBatchEntry(usize),

    /// The shell channel is not open
    #[error("Channel disconnected!")]
    ChannelDisconnected,

    /// Opening, authenticating or allocating the shell failed
    #[error("Connect fail: {0}")]
    Connect(String),

    /// Reading from or writing to the shell channel failed
    #[error("Execute has exception: {0}")]
    Io(#[from] std::io::Error),

    /// The charset label is not known
    #[error("Unsupported charset: {0}")]
    Charset(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`ShellError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected before any I/O because an input was blank or missing
    Validation,
    /// The channel was not connected when the call was made
    Connectivity,
    /// The transport failed while connecting or authenticating
    Transport,
    /// Sending or draining failed mid-call
    Io,
    /// The caller supplied an invalid setting
    Config,
}

/// Result type alias using ShellError
pub type Result<T> = std::result::Result<T, ShellError>;

impl ShellError {
    /// Create a connect error from a string
    pub fn connect(msg: impl Into<String>) -> Self {
        ShellError::Connect(msg.into())
    }

    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        ShellError::Config(msg.into())
    }

    /// Which part of the call failed
    pub fn kind(&self) -> FailureKind {
        match self {
            ShellError::BlankCommand
            | ShellError::BlankElevation
            | ShellError::EmptyBatch
            | ShellError::BlankBatchEntry(_) => FailureKind::Validation,
            ShellError::ChannelDisconnected => FailureKind::Connectivity,
            ShellError::Connect(_) => FailureKind::Transport,
            ShellError::Io(_) => FailureKind::Io,
            ShellError::Charset(_) | ShellError::Config(_) => FailureKind::Config,
        }
    }
}
