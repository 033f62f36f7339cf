//! Token storage for persisting login state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use cskit_core::{AccessToken, RefreshToken, TokenPair};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored token pair and the region it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub region: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredTokens {
    pub fn from_pair(region: &str, pair: &TokenPair) -> Self {
        Self {
            region: region.to_string(),
            access_token: pair.access_token.as_str().to_string(),
            refresh_token: pair.refresh_token.as_ref().map(|t| t.as_str().to_string()),
            expiry: pair.expiry,
        }
    }

    pub fn tokens(&self) -> TokenPair {
        TokenPair::new(
            AccessToken::new(&self.access_token),
            self.refresh_token.as_deref().map(RefreshToken::new),
        )
        .with_expiry(self.expiry)
    }
}

fn tokens_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "iks").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("tokens.json"))
}

/// Save tokens to disk, readable by the owner only.
pub fn save(tokens: &StoredTokens) -> Result<PathBuf> {
    let path = tokens_path()?;
    let json = serde_json::to_string_pretty(tokens)?;

    fs::write(&path, &json).context("Failed to write token file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

/// Load stored tokens, if any.
pub fn load() -> Result<Option<StoredTokens>> {
    let path = tokens_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read token file")?;
    let stored = serde_json::from_str(&json).context("Invalid token file")?;
    Ok(Some(stored))
}

/// Remove stored tokens. Returns false when there was nothing to remove.
pub fn clear() -> Result<bool> {
    let path = tokens_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove token file")?;
    Ok(true)
}
