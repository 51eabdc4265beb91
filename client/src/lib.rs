//! Nokia Health API Client
//!
//! Async client for the Nokia Health (Withings) REST API. Responses are
//! decoded and reconciled by `nokia-health-shared`.
//!
//! ## Modules
//!
//! - `client`: OAuth2 flow and data endpoints
//! - `params`: per-endpoint query parameters
//! - `auth`: token handling
//! - `export`: CSV export of normalized measurements

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod params;

pub use auth::Token;
pub use client::{Client, User};
pub use error::{ClientError, ClientResult};
