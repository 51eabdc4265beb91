//! HTTP client for the Nokia Health API
//!
//! [`Client`] holds the application credentials and drives the OAuth2
//! authorization-code flow. [`User`] carries one user's token and exposes
//! the data endpoints. Every data call decodes and reconciles the response
//! before returning it.

use chrono::Utc;
use nokia_health_shared::{
    decode_activity_measures, decode_ack, decode_body_measures, decode_intraday_activity,
    decode_notification_info, decode_notification_list, decode_sleep_measures,
    decode_sleep_summary, decode_workouts, AckResponse, ActivityMeasuresResponse, ApiResponse,
    BodyMeasuresResponse, DecodeResult, IntradayActivityResponse, NotificationInfoResponse,
    NotificationListResponse, SleepMeasuresResponse, SleepSummaryResponse, WorkoutsResponse,
};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::{Token, TokenBody};
use crate::config::{ApiConfig, OAuthConfig};
use crate::error::{ClientError, ClientResult};
use crate::params::*;

struct Inner {
    http: reqwest::Client,
    api: ApiConfig,
    client_id: String,
    client_secret: SecretString,
    redirect_url: String,
    authorize_url: String,
    token_url: String,
    scopes: String,
}

/// Application-level API client. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    pub fn new(api: ApiConfig, oauth: OAuthConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .user_agent(concat!("nokia-health/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                api,
                client_id: oauth.client_id,
                client_secret: SecretString::new(oauth.client_secret),
                redirect_url: oauth.redirect_url,
                authorize_url: oauth.authorize_url,
                token_url: oauth.token_url,
                scopes: oauth.scopes,
            }),
        })
    }

    /// Consent page URL the user must visit; `state` is echoed back on the redirect
    pub fn authorization_url(&self, state: &str) -> ClientResult<String> {
        let inner = &self.inner;
        let url = Url::parse_with_params(
            &inner.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", inner.client_id.as_str()),
                ("redirect_uri", inner.redirect_url.as_str()),
                ("scope", inner.scopes.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| ClientError::Url(e.to_string()))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for a user token
    pub async fn user_from_auth_code(&self, code: &str) -> ClientResult<User> {
        let (user_id, token) = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.inner.redirect_url.as_str()),
            ])
            .await?;

        info!(user_id, "Obtained access token");
        Ok(self.user_from_token(user_id, token))
    }

    /// User built from previously stored credentials
    pub fn user_from_token(&self, user_id: i64, token: Token) -> User {
        User {
            client: self.clone(),
            user_id,
            token,
        }
    }

    async fn request_token(&self, grant: &[(&str, &str)]) -> ClientResult<(i64, Token)> {
        let inner = &self.inner;
        let mut form = vec![
            ("action", "requesttoken"),
            ("client_id", inner.client_id.as_str()),
            ("client_secret", inner.client_secret.expose_secret().as_str()),
        ];
        form.extend_from_slice(grant);

        let issued_at = Utc::now();
        let bytes = inner
            .http
            .post(&inner.token_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let response: ApiResponse<TokenBody> =
            serde_json::from_slice(&bytes).map_err(nokia_health_shared::DecodeError::from)?;
        if !response.is_success() {
            warn!(status = %response.status, "Token request rejected");
            return Err(ClientError::Authorization {
                status: response.status,
            });
        }
        let body = response.body.ok_or(ClientError::MissingBody {
            status: response.status,
        })?;

        Ok((body.userid, Token::from_body(body, issued_at)))
    }

    async fn call<Q, B>(
        &self,
        token: &Token,
        query: &Q,
        decode: fn(&[u8]) -> DecodeResult<ApiResponse<B>>,
    ) -> ClientResult<ApiResponse<B>>
    where
        Q: QueryParams,
    {
        let inner = &self.inner;
        let pairs = query.to_pairs()?;
        let endpoint = format!(
            "{}/{}",
            inner.api.base_url.trim_end_matches('/'),
            Q::SERVICE
        );
        let url = Url::parse_with_params(
            &endpoint,
            std::iter::once(("action", Q::ACTION))
                .chain(pairs.iter().map(|(key, value)| (*key, value.as_str()))),
        )
        .map_err(|e| ClientError::Url(e.to_string()))?;

        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        info!(service = Q::SERVICE, action = Q::ACTION, "Calling API");
        debug!(path = %path, "Request");

        let bytes = inner
            .http
            .get(url)
            .bearer_auth(token.access_token())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let mut response = decode(&bytes)?;
        if !response.is_success() {
            warn!(
                action = Q::ACTION,
                status = %response.status,
                error = response.error.as_deref().unwrap_or(""),
                "API returned an error status"
            );
        }
        if inner.api.save_raw_response {
            response.raw_response = Some(bytes.to_vec());
        }
        if inner.api.include_path {
            response.path = Some(path);
        }
        Ok(response)
    }
}

/// An authorized user
pub struct User {
    client: Client,
    pub user_id: i64,
    token: Token,
}

impl User {
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Replace the token using the refresh grant
    pub async fn refresh_token(&mut self) -> ClientResult<()> {
        let refresh = self
            .token
            .refresh_token()
            .ok_or_else(|| ClientError::InvalidParams("no refresh token available".to_string()))?
            .to_string();

        let (user_id, token) = self
            .client
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh.as_str()),
            ])
            .await?;

        info!(user_id, "Refreshed access token");
        self.user_id = user_id;
        self.token = token;
        Ok(())
    }

    pub async fn get_body_measures(
        &self,
        query: &BodyMeasuresQuery,
    ) -> ClientResult<BodyMeasuresResponse> {
        let mut response = self
            .client
            .call(&self.token, query, decode_body_measures)
            .await?;
        if query.parse_response {
            if let Some(body) = response.body.as_mut() {
                body.parsed = Some(body.normalize());
            }
        }
        Ok(response)
    }

    pub async fn get_activity_measures(
        &self,
        query: &ActivityMeasuresQuery,
    ) -> ClientResult<ActivityMeasuresResponse> {
        self.client
            .call(&self.token, query, decode_activity_measures)
            .await
    }

    pub async fn get_intraday_activity(
        &self,
        query: &IntradayActivityQuery,
    ) -> ClientResult<IntradayActivityResponse> {
        self.client
            .call(&self.token, query, decode_intraday_activity)
            .await
    }

    pub async fn get_workouts(&self, query: &WorkoutsQuery) -> ClientResult<WorkoutsResponse> {
        self.client.call(&self.token, query, decode_workouts).await
    }

    pub async fn get_sleep_measures(
        &self,
        query: &SleepMeasuresQuery,
    ) -> ClientResult<SleepMeasuresResponse> {
        self.client
            .call(&self.token, query, decode_sleep_measures)
            .await
    }

    pub async fn get_sleep_summary(
        &self,
        query: &SleepSummaryQuery,
    ) -> ClientResult<SleepSummaryResponse> {
        self.client
            .call(&self.token, query, decode_sleep_summary)
            .await
    }

    pub async fn create_notification(
        &self,
        query: &CreateNotificationQuery,
    ) -> ClientResult<AckResponse> {
        self.client.call(&self.token, query, decode_ack).await
    }

    pub async fn notification_info(
        &self,
        query: &NotificationInfoQuery,
    ) -> ClientResult<NotificationInfoResponse> {
        self.client
            .call(&self.token, query, decode_notification_info)
            .await
    }

    pub async fn list_notifications(
        &self,
        query: &ListNotificationsQuery,
    ) -> ClientResult<NotificationListResponse> {
        self.client
            .call(&self.token, query, decode_notification_list)
            .await
    }

    pub async fn revoke_notification(
        &self,
        query: &RevokeNotificationQuery,
    ) -> ClientResult<AckResponse> {
        self.client.call(&self.token, query, decode_ack).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        let oauth = OAuthConfig {
            client_id: "abc".to_string(),
            client_secret: "s3cr3t".to_string(),
            ..OAuthConfig::default()
        };
        Client::new(ApiConfig::default(), oauth).unwrap()
    }

    #[test]
    fn test_authorization_url() {
        let url: Url = client().authorization_url("xyz").unwrap().parse().unwrap();
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("account.withings.com"));
        assert!(params.contains(&("response_type".to_string(), "code".to_string())));
        assert!(params.contains(&("client_id".to_string(), "abc".to_string())));
        assert!(params.contains(&("state".to_string(), "xyz".to_string())));
        assert!(params.contains(&(
            "scope".to_string(),
            "user.info,user.metrics,user.activity".to_string()
        )));
        assert!(!url.as_str().contains("s3cr3t"));
    }

    #[test]
    fn test_invalid_authorize_url() {
        let oauth = OAuthConfig {
            authorize_url: "not a url".to_string(),
            ..OAuthConfig::default()
        };
        let client = Client::new(ApiConfig::default(), oauth).unwrap();
        assert!(matches!(
            client.authorization_url("state"),
            Err(ClientError::Url(_))
        ));
    }
}
