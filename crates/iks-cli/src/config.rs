//! Config file loading and layering over command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use cskit_core::{Config, Credentials, EndpointUrl, RequestTarget};

use crate::cli::ConnectArgs;
use crate::session::storage::StoredTokens;

/// Settings read from `config.json`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub iam_endpoint: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    pub account: Option<String>,
    pub resource_group: Option<String>,
}

impl ConfigFile {
    /// Read the file at `path`, or the default location. A missing file is an
    /// empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "iks").map(|dirs| dirs.config_dir().join("config.json"))
}

/// Build the library config: flags over file over defaults, then seed any
/// stored tokens.
///
/// Stored tokens are only used for the same region, and never when
/// credentials were passed on this invocation (flag or environment).
pub fn resolve(
    args: &ConnectArgs,
    file: &ConfigFile,
    stored: Option<&StoredTokens>,
) -> Result<Config> {
    let mut config = Config::default();

    let explicit_credentials = args.api_key.is_some() || args.username.is_some();
    config.credentials = match (&args.api_key, &args.username, &args.password) {
        (Some(key), _, _) => Some(Credentials::api_key(key)),
        (None, Some(user), Some(password)) => Some(Credentials::password(user, password)),
        (None, Some(_), None) => anyhow::bail!("--username requires --password"),
        _ => file.api_key.as_deref().map(Credentials::api_key),
    };

    if let Some(region) = args.region.as_ref().or(file.region.as_ref()) {
        config = config.with_region(region);
    }

    if let Some(endpoint) = args.endpoint.as_ref().or(file.endpoint.as_ref()) {
        let url = EndpointUrl::new(endpoint).context("Invalid container endpoint")?;
        config = config.with_endpoint(url);
    }

    if let Some(endpoint) = args.iam_endpoint.as_ref().or(file.iam_endpoint.as_ref()) {
        let url = EndpointUrl::new(endpoint).context("Invalid IAM endpoint")?;
        config = config.with_iam_endpoint(url);
    }

    if let Some(secs) = args.timeout.or(file.http_timeout_secs) {
        config = config.with_http_timeout(Duration::from_secs(secs));
    }

    if let Some(retries) = args.max_retries.or(file.max_retries) {
        config = config.with_max_retries(retries);
    }

    if let Some(secs) = args.retry_delay.or(file.retry_delay_secs) {
        config = config.with_retry_delay(Duration::from_secs(secs));
    }

    if let Some(stored) = stored.filter(|s| s.region == config.region)
        && !explicit_credentials
    {
        config = config.with_tokens(stored.tokens());
    }

    config = config.with_user_agent(concat!("iks/", env!("IKS_VERSION")));

    Ok(config)
}

/// Target headers from flags, falling back to the config file.
pub fn target(args: &ConnectArgs, file: &ConfigFile) -> RequestTarget {
    let mut target = RequestTarget::new();
    if let Some(account) = args.account.as_ref().or(file.account.as_ref()) {
        target = target.with_account(account);
    }
    if let Some(group) = args.resource_group.as_ref().or(file.resource_group.as_ref()) {
        target = target.with_resource_group(group);
    }
    target
}
