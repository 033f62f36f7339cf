//! Long-lived authenticated session.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use cskit_core::error::AuthError;
use cskit_core::store::EXPIRY_SKEW_SECS;
use cskit_core::{
    AccessToken, Config, CredentialStore, Credentials, EndpointUrl, Result, RetryPolicy, Service,
    TokenAuthenticator, TokenPair,
};

use crate::iam::IamAuthenticator;

/// An authenticated session against one account and region.
///
/// Owns the credential store, the token authenticator and the resolved
/// service endpoints. Cheap to clone (internal `Arc`) and safe to share
/// across tasks.
///
/// # Token refresh
///
/// Refreshes are singleflight: however many tasks find the token missing or
/// stale at once, one of them calls the authenticator and the rest reuse its
/// result.
///
/// # Example
///
/// ```no_run
/// use cskit_core::{Config, Credentials};
/// use cskit_rest::Session;
///
/// # async fn example() -> Result<(), cskit_core::Error> {
/// let config = Config::new(Credentials::api_key("my-api-key")).with_region("eu-de");
/// let session = Session::connect(config).await?;
/// println!("Container endpoint: {}", session.endpoint());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    credentials: Option<Credentials>,
    region: String,
    endpoint: EndpointUrl,
    identity_endpoint: EndpointUrl,
    config: Config,
    authenticator: Arc<dyn TokenAuthenticator>,
    store: RwLock<CredentialStore>,
    refresh_guard: Mutex<()>,
}

/// An access token together with the store generation it was read at.
#[derive(Debug, Clone)]
pub(crate) struct Lease {
    pub token: AccessToken,
    pub generation: u64,
}

impl Session {
    /// Create a session without touching the network.
    ///
    /// The first call to [`Session::ensure_valid_token`] authenticates,
    /// unless the config carries a pre-supplied token pair.
    ///
    /// # Errors
    ///
    /// Returns a config error for invalid configuration and
    /// `UnknownRegion` when an endpoint cannot be resolved.
    pub fn new(config: Config, authenticator: Arc<dyn TokenAuthenticator>) -> Result<Self> {
        config.validate()?;

        let locator = config.locator();
        let endpoint = locator.resolve(Service::Container, &config.region)?;
        let identity_endpoint = locator.resolve(Service::Iam, &config.region)?;

        let store = match config.seeded_tokens() {
            Some(pair) => CredentialStore::seeded(pair),
            None => CredentialStore::new(),
        };

        debug!(region = %config.region, %endpoint, "Session created");

        Ok(Self {
            inner: Arc::new(SessionInner {
                credentials: config.credentials.clone(),
                region: config.region.clone(),
                endpoint,
                identity_endpoint,
                config,
                authenticator,
                store: RwLock::new(store),
                refresh_guard: Mutex::new(()),
            }),
        })
    }

    /// Create a session with the IAM authenticator and obtain a token now.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or authentication fails.
    #[instrument(skip(config), fields(region = %config.region))]
    pub async fn connect(config: Config) -> Result<Self> {
        let authenticator = Arc::new(IamAuthenticator::new(&config)?);
        let session = Self::new(config, authenticator)?;
        session.ensure_valid_token().await?;
        Ok(session)
    }

    /// Returns a usable access token, authenticating or refreshing first when
    /// no token is stored or the stored one is stale or expired.
    ///
    /// # Errors
    ///
    /// Propagates the authenticator's error. The stale pair stays in the
    /// store.
    pub async fn ensure_valid_token(&self) -> Result<AccessToken> {
        Ok(self.lease().await?.token)
    }

    /// Refresh now, whether or not the stored token still looks valid.
    pub async fn force_refresh(&self) -> Result<AccessToken> {
        let observed = self.inner.store.read().await.generation();
        Ok(self.force_refresh_from(observed).await?.token)
    }

    /// Returns the resolved container-service endpoint.
    pub fn endpoint(&self) -> &EndpointUrl {
        &self.inner.endpoint
    }

    /// Returns the resolved identity endpoint.
    pub fn identity_endpoint(&self) -> &EndpointUrl {
        &self.inner.identity_endpoint
    }

    pub fn region(&self) -> &str {
        &self.inner.region
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.config.retry_policy()
    }

    /// Snapshot of the stored token pair, for callers that persist tokens.
    ///
    /// # Security
    ///
    /// The pair grants access to the account. Store it securely.
    pub async fn export_tokens(&self) -> Option<TokenPair> {
        self.inner.store.read().await.pair().cloned()
    }

    pub(crate) async fn lease(&self) -> Result<Lease> {
        let observed = {
            let store = self.inner.store.read().await;
            if let Some(token) = store.current(Utc::now()) {
                return Ok(Lease {
                    token: token.clone(),
                    generation: store.generation(),
                });
            }
            store.generation()
        };

        self.refresh_from(observed).await
    }

    /// Mark the token read at `observed` stale and refresh.
    ///
    /// If another task already replaced that token, its result is reused.
    pub(crate) async fn force_refresh_from(&self, observed: u64) -> Result<Lease> {
        self.inner.store.write().await.mark_stale(observed);
        self.refresh_from(observed).await
    }

    async fn refresh_from(&self, observed: u64) -> Result<Lease> {
        let _singleflight = self.inner.refresh_guard.lock().await;

        let refresh_token = {
            let store = self.inner.store.read().await;
            if let Some(token) = store.replaced_since(observed) {
                debug!("Reusing token from concurrent refresh");
                return Ok(Lease {
                    token: token.clone(),
                    generation: store.generation(),
                });
            }
            store.refresh_token().cloned()
        };

        let identity = &self.inner.identity_endpoint;
        let pair = match refresh_token {
            Some(refresh_token) => {
                self.inner
                    .authenticator
                    .refresh(identity, &refresh_token)
                    .await?
            }
            None => {
                let credentials = self
                    .inner
                    .credentials
                    .as_ref()
                    .ok_or_else(|| AuthError::CannotRenew {
                        endpoint: identity.to_string(),
                    })?;
                self.inner
                    .authenticator
                    .authenticate(identity, credentials)
                    .await?
            }
        };

        let pair = discard_unusable_expiry(pair);
        let token = pair.access_token.clone();
        let generation = self.inner.store.write().await.replace(pair);

        info!(generation, "Token pair stored");
        Ok(Lease { token, generation })
    }
}

/// A freshly issued pair whose declared expiry has already passed carries a
/// bad clock or a bogus `expires_in`. Drop the expiry so the pair is used
/// until the service rejects it.
fn discard_unusable_expiry(pair: TokenPair) -> TokenPair {
    if pair.expires_within(Utc::now(), TimeDelta::seconds(EXPIRY_SKEW_SECS)) {
        warn!(expiry = ?pair.expiry, "Ignoring expiry of newly issued token");
        return pair.with_expiry(None);
    }
    pair
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("region", &self.inner.region)
            .field("endpoint", &self.inner.endpoint)
            .field("identity_endpoint", &self.inner.identity_endpoint)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
