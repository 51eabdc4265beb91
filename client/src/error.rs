//! Client error handling

use nokia_health_shared::{DecodeError, Status};
use thiserror::Error;

/// Errors raised while talking to the API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Authorization failed: {status}")]
    Authorization { status: Status },

    #[error("Response has no body: {status}")]
    MissingBody { status: Status },

    #[error("Export failed: {0}")]
    Export(String),
}

/// Result type alias for client calls
pub type ClientResult<T> = Result<T, ClientError>;
