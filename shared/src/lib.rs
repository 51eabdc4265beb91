//! Nokia Health Shared Library
//!
//! Pure decoding core for the Nokia Health (Withings) API: response types,
//! code enumerations, value decoding, measurement normalization and date
//! reconciliation. No I/O happens here; the client crate feeds raw payloads in.

pub mod dates;
pub mod decode;
pub mod errors;
pub mod measures;
pub mod models;
pub mod types;
pub mod units;

// Re-export commonly used items
pub use decode::*;
pub use errors::*;
pub use measures::{normalize, Measurement, MeasurementCollection};
pub use models::*;
pub use types::*;
pub use units::*;
