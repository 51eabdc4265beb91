//! OAuth2 tokens
//!
//! Tokens are obtained through the authorization-code flow driven by
//! [`crate::client::Client`]. Only the access token is needed for data
//! calls; the refresh token is optional so stored credentials without one
//! still work until they expire.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Credentials for one user
#[derive(Debug)]
pub struct Token {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
}

impl Token {
    /// Token from a bare access token, e.g. one read from configuration
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            refresh_token: None,
            expires_at: None,
            scope: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(SecretString::new(refresh_token.into()));
        self
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Unknown expiry counts as not expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }

    pub(crate) fn from_body(body: TokenBody, issued_at: DateTime<Utc>) -> Self {
        Self {
            access_token: SecretString::new(body.access_token),
            refresh_token: Some(SecretString::new(body.refresh_token)),
            expires_at: Some(issued_at + Duration::seconds(body.expires_in)),
            scope: body.scope,
        }
    }
}

/// Token endpoint body
#[derive(Deserialize)]
pub(crate) struct TokenBody {
    #[serde(deserialize_with = "deserialize_user_id")]
    pub userid: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

/// The token endpoint sends the user id as a string
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UserId {
        Number(i64),
        Text(String),
    }

    match UserId::deserialize(deserializer)? {
        UserId::Number(id) => Ok(id),
        UserId::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
