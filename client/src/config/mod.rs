//! Configuration management for the Nokia Health client
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: NH__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub user: UserConfig,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Keep the raw payload on every decoded response
    pub save_raw_response: bool,
    /// Keep the request path on every decoded response
    pub include_path: bool,
}

/// OAuth2 application credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub authorize_url: String,
    pub token_url: String,
    /// Comma-separated scope list
    pub scopes: String,
}

/// Stored credentials of the user the CLI acts for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    pub user_id: Option<i64>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wbsapi.withings.net".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            save_raw_response: false,
            include_path: false,
        }
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: "http://localhost:8080/callback".to_string(),
            authorize_url: "https://account.withings.com/oauth2_user/authorize2".to_string(),
            token_url: "https://wbsapi.withings.net/v2/oauth2".to_string(),
            scopes: "user.info,user.metrics,user.activity".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            oauth: OAuthConfig::default(),
            user: UserConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with NH__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., NH__API__BASE_URL=http://localhost:9000 sets api.base_url
            .add_source(config::Environment::with_prefix("NH").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://wbsapi.withings.net");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(!config.api.save_raw_response);
        assert!(config.oauth.scopes.contains("user.metrics"));
        assert!(config.user.access_token.is_none());
    }

    #[test]
    fn test_defaults_survive_config_roundtrip() {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default()).unwrap())
            .build()
            .unwrap();
        let loaded: AppConfig = config.try_deserialize().unwrap();

        assert_eq!(loaded.oauth.token_url, "https://wbsapi.withings.net/v2/oauth2");
        assert_eq!(loaded.api.connect_timeout_secs, 10);
        assert!(loaded.user.user_id.is_none());
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
