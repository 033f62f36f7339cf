//! Login credentials type.

use std::fmt;

/// Credentials used to obtain an IAM token pair.
///
/// Either a platform API key, or a username with its password. The secret
/// is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use cskit_core::Credentials;
///
/// let creds = Credentials::api_key("my-api-key");
/// assert!(creds.is_api_key());
///
/// let creds = Credentials::password("alice@example.com", "hunter2");
/// assert_eq!(creds.identifier(), "alice@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identifier: String,
    password: Option<String>,
}

impl Credentials {
    /// Credentials backed by an API key.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            identifier: key.into(),
            password: None,
        }
    }

    /// Credentials backed by a username and password.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: username.into(),
            password: Some(password.into()),
        }
    }

    /// Returns true when these credentials carry an API key.
    pub fn is_api_key(&self) -> bool {
        self.password.is_none()
    }

    /// Returns the API key or username.
    ///
    /// # Security
    ///
    /// For API-key credentials this is the secret itself. Never log it.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the password, if these are username/password credentials.
    ///
    /// # Security
    ///
    /// Use this only when constructing token requests.
    pub fn secret(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns true when the identifier (and password, if any) is non-empty.
    pub fn is_complete(&self) -> bool {
        !self.identifier.trim().is_empty()
            && self.password.as_deref().is_none_or(|p| !p.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_api_key() {
            f.debug_struct("Credentials")
                .field("api_key", &"[REDACTED]")
                .finish()
        } else {
            f.debug_struct("Credentials")
                .field("username", &self.identifier)
                .field("password", &"[REDACTED]")
                .finish()
        }
    }
}
