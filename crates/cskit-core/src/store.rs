//! In-memory credential store.
//!
//! Plain data plus mutation methods. Synchronization is the owner's job; the
//! session wraps the store in a lock and uses [`CredentialStore::generation`]
//! to collapse concurrent refreshes.

use chrono::{DateTime, TimeDelta, Utc};

use crate::tokens::{AccessToken, RefreshToken, TokenPair};

/// Seconds before the declared expiry at which a token is treated as expired.
pub const EXPIRY_SKEW_SECS: i64 = 30;

/// Holds the current token pair, a stale flag and a generation counter.
///
/// The generation increases by one every time a new pair is written, so a
/// caller can tell whether the token it used is still the current one.
#[derive(Debug, Default)]
pub struct CredentialStore {
    pair: Option<TokenPair>,
    stale: bool,
    generation: u64,
}

impl CredentialStore {
    /// An empty store. The first token request will authenticate.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with an existing pair, e.g. tokens restored from disk.
    pub fn seeded(pair: TokenPair) -> Self {
        let mut store = Self::new();
        store.replace(pair);
        store
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pair(&self) -> Option<&TokenPair> {
        self.pair.as_ref()
    }

    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.pair.as_ref().and_then(|p| p.refresh_token.as_ref())
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns the access token if one is present, not flagged stale, and not
    /// past its declared expiry.
    pub fn current(&self, now: DateTime<Utc>) -> Option<&AccessToken> {
        if self.stale {
            return None;
        }
        let skew = TimeDelta::seconds(EXPIRY_SKEW_SECS);
        self.pair
            .as_ref()
            .filter(|p| !p.access_token.is_empty() && !p.expires_within(now, skew))
            .map(|p| &p.access_token)
    }

    /// Returns the access token written after generation `observed`, unless it
    /// has since been flagged stale.
    ///
    /// Ignores the declared expiry: a pair that another caller just obtained
    /// is reused as is.
    pub fn replaced_since(&self, observed: u64) -> Option<&AccessToken> {
        if self.stale || self.generation == observed {
            return None;
        }
        self.pair
            .as_ref()
            .filter(|p| !p.access_token.is_empty())
            .map(|p| &p.access_token)
    }

    /// Flag the token of `observed` generation as stale.
    ///
    /// Returns false, and changes nothing, when a newer pair has already been
    /// written since the caller observed the token.
    pub fn mark_stale(&mut self, observed: u64) -> bool {
        if self.generation != observed {
            return false;
        }
        self.stale = true;
        true
    }

    /// Replace the stored pair. Clears the stale flag and returns the new
    /// generation.
    pub fn replace(&mut self, pair: TokenPair) -> u64 {
        self.pair = Some(pair);
        self.stale = false;
        self.generation += 1;
        self.generation
    }
}
