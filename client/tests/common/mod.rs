//! Common test utilities for integration tests
//!
//! Each test gets its own mock API server; the client is pointed at it for
//! both the data endpoints and the token endpoint.

#![allow(dead_code)]

use nokia_health_client::{
    config::{ApiConfig, OAuthConfig},
    Client, Token, User,
};
use wiremock::MockServer;

pub const ACCESS_TOKEN: &str = "test-access-token";
pub const USER_ID: i64 = 1234;

/// Test application wrapper
pub struct TestApi {
    pub server: MockServer,
    pub client: Client,
}

impl TestApi {
    pub async fn new() -> Self {
        Self::with_api_config(|_| {}).await
    }

    /// Start a mock server, adjusting the API config before building the client
    pub async fn with_api_config(adjust: impl FnOnce(&mut ApiConfig)) -> Self {
        let server = MockServer::start().await;

        let mut api = ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            connect_timeout_secs: 5,
            save_raw_response: false,
            include_path: false,
        };
        adjust(&mut api);

        let oauth = OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            token_url: format!("{}/v2/oauth2", server.uri()),
            ..OAuthConfig::default()
        };

        let client = Client::new(api, oauth).expect("Failed to build client");
        Self { server, client }
    }

    /// User authorized with the fixed test access token
    pub fn user(&self) -> User {
        self.client.user_from_token(
            USER_ID,
            Token::from_access_token(ACCESS_TOKEN).with_refresh_token("test-refresh-token"),
        )
    }
}
