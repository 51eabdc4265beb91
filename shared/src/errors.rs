//! Error types for decoding API responses

use thiserror::Error;

/// Failure to turn a raw API response into typed records.
///
/// Unrecognized measurement type codes are deliberately absent: they are
/// skipped during normalization and never surface as an error.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid response payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid calendar date '{value}': {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

/// Result alias for the decoding layer
pub type DecodeResult<T> = Result<T, DecodeError>;
