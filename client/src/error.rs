//! Error types for the todo REST client

use thiserror::Error;

/// Errors that can occur when talking to the todo API
///
/// The list store treats every variant the same way: log it and move on.
/// The variants only exist so the log line says what went wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client could not be constructed
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(String),

    /// Request never produced a response (connection, timeout, ...)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Response body was not what the API promises
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

/// Result alias for API calls
pub type Result<T> = std::result::Result<T, ApiError>;
