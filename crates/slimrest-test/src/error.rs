//! Test client error types.

use thiserror::Error;

/// Errors produced by the test client.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be constructed.
    #[error("invalid test request: {0}")]
    Request(#[from] http::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// The response body was not the expected JSON.
    #[error("failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),
}
