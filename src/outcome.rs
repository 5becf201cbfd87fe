//! Success/failure envelope for callers that want a flat result value
//!
//! Every operation on [`ShellSession`](crate::ssh::ShellSession) returns a
//! `Result`; `ExecutionResult` folds that into `{success, message, payload}`
//! for printing or JSON output.

use serde::Serialize;

use crate::error::{FailureKind, Result, ShellError};

/// Message carried by a successful execution
pub const EXECUTE_COMPLETED: &str = "Execute completed.";

/// Message carried by a successful connect
pub const CONNECT_SUCCESS: &str = "Connect success.";

/// Flattened outcome of a connect or execute call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Whether the call completed
    pub success: bool,

    /// Fixed success message, or the error text on failure
    pub message: String,

    /// Captured terminal output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    /// Failure classification, absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl ExecutionResult {
    /// Successful execution carrying captured output
    pub fn completed(payload: impl Into<String>) -> Self {
        Self {
            success: true,
            message: EXECUTE_COMPLETED.to_string(),
            payload: Some(payload.into()),
            failure: None,
        }
    }

    /// Failed call
    pub fn failed(error: &ShellError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            payload: None,
            failure: Some(error.kind()),
        }
    }

    /// Envelope for the result of [`ShellSession::connect`](crate::ssh::ShellSession::connect)
    pub fn from_connect(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                message: CONNECT_SUCCESS.to_string(),
                payload: None,
                failure: None,
            },
            Err(e) => Self::failed(e),
        }
    }
}

impl From<Result<String>> for ExecutionResult {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(output) => Self::completed(output),
            Err(e) => Self::failed(&e),
        }
    }
}
