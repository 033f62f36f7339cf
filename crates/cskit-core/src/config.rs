//! Client configuration.

use std::time::Duration;

use crate::endpoints::{DEFAULT_REGION, EndpointLocator, Service};
use crate::error::{ConfigError, Error};
use crate::tokens::TokenPair;
use crate::types::EndpointUrl;
use crate::Credentials;

/// Default per-request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(180);

/// Default number of attempts for caller-side polling.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default pause between caller-side polling attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Bounds for callers that poll a resource until it reaches a state.
///
/// The REST client never consults this; its only automatic retry is the
/// single forced-refresh retry on an authentication failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

/// Configuration consumed by the session and REST client.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use cskit_core::{Config, Credentials};
///
/// let config = Config::new(Credentials::api_key("my-api-key"))
///     .with_region("eu-de")
///     .with_http_timeout(Duration::from_secs(60));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Option<Credentials>,
    pub region: String,
    pub endpoint_override: Option<EndpointUrl>,
    pub iam_endpoint_override: Option<EndpointUrl>,
    pub endpoints: EndpointLocator,
    pub max_retries: u32,
    pub http_timeout: Duration,
    pub retry_delay: Duration,
    pub user_agent: String,
    /// Pre-supplied token pair, including its declared expiry if known.
    pub iam_tokens: Option<TokenPair>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: None,
            region: DEFAULT_REGION.to_string(),
            endpoint_override: None,
            iam_endpoint_override: None,
            endpoints: EndpointLocator::public(),
            max_retries: DEFAULT_MAX_RETRIES,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            user_agent: concat!("cskit/", env!("CARGO_PKG_VERSION")).to_string(),
            iam_tokens: None,
        }
    }
}

impl Config {
    /// Configuration for `credentials` with defaults everywhere else.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Use `url` for the container service regardless of region.
    pub fn with_endpoint(mut self, url: EndpointUrl) -> Self {
        self.endpoint_override = Some(url);
        self
    }

    /// Use `url` for the identity service regardless of region.
    pub fn with_iam_endpoint(mut self, url: EndpointUrl) -> Self {
        self.iam_endpoint_override = Some(url);
        self
    }

    /// Replace the region lookup table.
    pub fn with_endpoint_table(mut self, endpoints: EndpointLocator) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Seed the session with an existing token pair, skipping the initial
    /// authentication while the pair's expiry (if any) has not passed.
    pub fn with_tokens(mut self, pair: TokenPair) -> Self {
        self.iam_tokens = Some(pair);
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: self.retry_delay,
        }
    }

    /// The pre-supplied token pair, if an access token was configured.
    pub fn seeded_tokens(&self) -> Option<TokenPair> {
        self.iam_tokens
            .as_ref()
            .filter(|pair| !pair.access_token.is_empty())
            .cloned()
    }

    /// The lookup table with configured overrides applied.
    pub fn locator(&self) -> EndpointLocator {
        let mut locator = self.endpoints.clone();
        if let Some(ref url) = self.endpoint_override {
            locator = locator.with_override(Service::Container, url.clone());
        }
        if let Some(ref url) = self.iam_endpoint_override {
            locator = locator.with_override(Service::Iam, url.clone());
        }
        locator
    }

    /// Check the configuration before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing credentials (unless a token pair is
    /// seeded), incomplete credentials, an empty region or a zero timeout.
    pub fn validate(&self) -> Result<(), Error> {
        match self.credentials {
            Some(ref creds) if !creds.is_complete() => {
                return Err(ConfigError::Empty {
                    field: if creds.is_api_key() {
                        "api key"
                    } else {
                        "username/password"
                    },
                }
                .into());
            }
            None if self.seeded_tokens().is_none() => {
                return Err(ConfigError::MissingCredentials.into());
            }
            _ => {}
        }

        if self.region.trim().is_empty() {
            return Err(ConfigError::Empty { field: "region" }.into());
        }

        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout.into());
        }

        Ok(())
    }
}
