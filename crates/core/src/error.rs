//! Unified error types for shoptrends.
//!
//! Only `InvalidRange` ever reaches a caller of the trend service; the fetch
//! and parse variants are produced inside extraction strategies and absorbed
//! by the cascade.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::model::SNAPSHOT_SIZE;

/// Unified error types for the shoptrends service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Requested prefix length is outside `1..=100`.
    #[error("INVALID_RANGE: limit must be between 1 and {max}, got {limit}", max = SNAPSHOT_SIZE)]
    InvalidRange { limit: i64 },

    /// Invalid input parameters.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Connection failure or other transport error.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Non-2xx HTTP response.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Malformed document or JSON payload.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Scheduler could not be configured.
    #[error("SCHEDULE_ERROR: {0}")]
    Schedule(String),
}

impl Error {
    /// Validate a requested prefix length.
    pub fn check_limit(limit: i64) -> Result<usize, Error> {
        if (1..=SNAPSHOT_SIZE as i64).contains(&limit) {
            Ok(limit as usize)
        } else {
            Err(Error::InvalidRange { limit })
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidRange { .. } | Error::InvalidInput(_) => -32602,
            Error::Network(_) => -32001,
            Error::FetchTimeout(_) => -32002,
            Error::HttpError(_) => -32003,
            Error::Parse(_) => -32004,
            Error::Schedule(_) => -32005,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
