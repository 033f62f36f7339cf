//! CLI session: a connected client plus the request target.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use cskit_container::ContainerService;
use cskit_core::{RequestTarget, RetryPolicy};
use cskit_rest::{IamAuthenticator, RestClient, Session};

use crate::cli::ConnectArgs;
use crate::config::{self, ConfigFile};
use storage::StoredTokens;

/// Everything a command needs to talk to the service.
pub struct CliSession {
    client: Arc<RestClient>,
    target: RequestTarget,
    persisted: bool,
}

impl CliSession {
    /// Build a lazy session from flags, the config file and stored tokens.
    ///
    /// Nothing is sent until the first request.
    pub fn open(args: &ConnectArgs) -> Result<Self> {
        let stored = storage::load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable token file");
            None
        });
        Self::build(args, stored.as_ref())
    }

    /// Like [`CliSession::open`], but ignores stored tokens so the first
    /// request authenticates with the configured credentials.
    pub fn fresh(args: &ConnectArgs) -> Result<Self> {
        Self::build(args, None)
    }

    fn build(args: &ConnectArgs, stored: Option<&StoredTokens>) -> Result<Self> {
        let file = ConfigFile::load(args.config.as_deref())?;
        let config = config::resolve(args, &file, stored)?;
        let persisted = config.seeded_tokens().is_some();

        let authenticator = Arc::new(IamAuthenticator::new(&config)?);
        let session = Session::new(config, authenticator).context(
            "Failed to set up session. Pass --api-key (or IC_API_KEY), or run 'iks login' first.",
        )?;
        let client = RestClient::new(session)?;

        Ok(Self {
            client: Arc::new(client),
            target: config::target(args, &file),
            persisted,
        })
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    pub fn service(&self) -> ContainerService {
        ContainerService::new(self.client.clone())
    }

    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.session().retry_policy()
    }

    /// Write the current tokens back when they came from storage, so a
    /// refresh made during the command is kept.
    pub async fn persist(&self) -> Result<()> {
        if self.persisted {
            self.save().await?;
        }
        Ok(())
    }

    /// Write the current tokens to storage.
    pub async fn save(&self) -> Result<Option<std::path::PathBuf>> {
        let Some(pair) = self.session().export_tokens().await else {
            return Ok(None);
        };
        let stored = StoredTokens::from_pair(self.session().region(), &pair);
        storage::save(&stored).map(Some)
    }
}
