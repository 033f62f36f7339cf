//! IAM token authenticator.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use cskit_core::error::{AuthError, ConfigError, DecodeError};
use cskit_core::{
    AccessToken, ApiPath, Config, Credentials, EndpointUrl, Error, RefreshToken, Result,
    TokenAuthenticator, TokenPair,
};

use crate::errors::{parse_error_body, transport_error};
use crate::transport::build_client;

/// Token endpoint path under the identity service.
const TOKEN_PATH: &str = "/identity/token";

const GRANT_API_KEY: &str = "urn:ibm:params:oauth:grant-type:apikey";
const GRANT_PASSWORD: &str = "password";
const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// Client id/secret the identity service expects from CLI-style clients.
const CLIENT_ID: &str = "bx";
const CLIENT_SECRET: &str = "bx";

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Absolute expiry, unix seconds.
    #[serde(default)]
    expiration: Option<i64>,
    /// Relative expiry, seconds.
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expiration
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| {
                self.expires_in
                    .and_then(TimeDelta::try_seconds)
                    .map(|delta| now + delta)
            })
    }
}

/// [`TokenAuthenticator`] backed by the IAM token endpoint.
///
/// Posts a form-encoded grant to `{identity}/identity/token`. One exchange
/// per call; failures are returned as-is.
#[derive(Debug, Clone)]
pub struct IamAuthenticator {
    client: reqwest::Client,
}

impl IamAuthenticator {
    /// Create an authenticator using the configured user agent and timeout.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn request_token(
        &self,
        identity_endpoint: &EndpointUrl,
        form: &[(&str, &str)],
    ) -> Result<TokenPair> {
        let url = identity_endpoint.join(&ApiPath::new(TOKEN_PATH));
        let url_str = url.to_string();

        let response = self
            .client
            .post(url)
            .basic_auth(CLIENT_ID, Some(CLIENT_SECRET))
            .header(ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(|e| transport_error(&url_str, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url_str, e))?;

        if !status.is_success() {
            let details = parse_error_body(&body);
            return Err(AuthError::Rejected {
                endpoint: url_str,
                status: status.as_u16(),
                code: details.code,
                message: details.message,
            }
            .into());
        }

        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| DecodeError::new(url_str.clone(), e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(AuthError::EmptyAccessToken { endpoint: url_str }.into());
        }

        let expiry = token.expiry(Utc::now());
        debug!(expiry = ?expiry, "token issued");

        Ok(TokenPair::new(
            AccessToken::new(token.access_token),
            token
                .refresh_token
                .filter(|t| !t.is_empty())
                .map(RefreshToken::new),
        )
        .with_expiry(expiry))
    }
}

#[async_trait]
impl TokenAuthenticator for IamAuthenticator {
    #[instrument(skip(self, credentials), fields(identity = %identity_endpoint))]
    async fn authenticate(
        &self,
        identity_endpoint: &EndpointUrl,
        credentials: &Credentials,
    ) -> Result<TokenPair> {
        if !credentials.is_complete() {
            return Err(ConfigError::MissingCredentials.into());
        }

        match credentials.secret() {
            None => {
                info!("Authenticating with API key");
                self.request_token(
                    identity_endpoint,
                    &[
                        ("grant_type", GRANT_API_KEY),
                        ("apikey", credentials.identifier()),
                    ],
                )
                .await
            }
            Some(password) => {
                info!(username = %credentials.identifier(), "Authenticating with password");
                self.request_token(
                    identity_endpoint,
                    &[
                        ("grant_type", GRANT_PASSWORD),
                        ("username", credentials.identifier()),
                        ("password", password),
                    ],
                )
                .await
            }
        }
    }

    #[instrument(skip(self, refresh_token), fields(identity = %identity_endpoint))]
    async fn refresh(
        &self,
        identity_endpoint: &EndpointUrl,
        refresh_token: &RefreshToken,
    ) -> Result<TokenPair> {
        if refresh_token.as_str().is_empty() {
            return Err(ConfigError::Empty {
                field: "refresh token",
            }
            .into());
        }

        info!("Refreshing IAM token");
        self.request_token(
            identity_endpoint,
            &[
                ("grant_type", GRANT_REFRESH_TOKEN),
                ("refresh_token", refresh_token.as_str()),
            ],
        )
        .await
    }
}
