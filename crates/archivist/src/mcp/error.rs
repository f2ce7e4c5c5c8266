//! Envelope-level protocol errors.
//!
//! These become JSON-RPC `error` objects. Tool-level failures never reach this
//! type; they are rendered as `"Error: ..."` text inside a successful result.

use thiserror::Error;

/// JSON-RPC code for a message without a usable `method`.
pub const INVALID_REQUEST: i32 = -32600;

/// JSON-RPC code for every other envelope-level failure.
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum McpError {
    /// The inbound message is not valid JSON.
    #[error("Internal error: {0}")]
    Parse(String),

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: Method not found: {0}")]
    MethodNotFound(String),

    /// Any failure or panic during dispatch.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::Parse(_) | McpError::MethodNotFound(_) | McpError::Internal(_) => INTERNAL_ERROR,
        }
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Internal(err.to_string())
    }
}
