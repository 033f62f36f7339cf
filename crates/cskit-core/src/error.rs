//! Error types for cskit.
//!
//! One unified error with a variant per failure class, so callers can tell a
//! rejected credential from a business error or a malformed response without
//! string matching.

use std::fmt;
use thiserror::Error;

use crate::endpoints::Service;

/// The unified error type for cskit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration, detected before any network call.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The identity endpoint rejected the credentials, or the resource
    /// service rejected a freshly refreshed token.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// No endpoint could be resolved for a service and region.
    #[error("endpoint resolution error: {0}")]
    Endpoint(#[from] EndpointError),

    /// Network transport errors (connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx business error returned by the resource service.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// A 2xx response whose body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    /// Returns true for authentication failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Returns the HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) => Some(err.status),
            Error::Auth(AuthError::Rejected { status, .. })
            | Error::Auth(AuthError::TokenRejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither an API key nor a username/password pair was supplied.
    #[error("no credentials configured (set an API key or username/password)")]
    MissingCredentials,

    /// A required value was empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A URL failed validation.
    #[error("invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    /// A service name did not match any known service.
    #[error("unknown service '{name}'")]
    UnknownService { name: String },

    /// The HTTP timeout was zero.
    #[error("HTTP timeout must be greater than zero")]
    InvalidTimeout,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {reason}")]
    HttpClient { reason: String },
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity endpoint rejected a token request.
    #[error(
        "identity endpoint {endpoint} rejected the token request (HTTP {status}){}",
        upstream(.code, .message)
    )]
    Rejected {
        endpoint: String,
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    /// The resource service rejected the token on both attempts of a call.
    #[error(
        "{url} rejected the access token after a forced refresh (HTTP {status}){}",
        upstream(&None, .message)
    )]
    TokenRejected {
        url: String,
        status: u16,
        message: Option<String>,
    },

    /// The stored token needs renewing but there is neither a refresh token
    /// nor credentials to renew it with.
    #[error("access token for {endpoint} expired and cannot be renewed (no refresh token or credentials)")]
    CannotRenew { endpoint: String },

    /// The identity endpoint answered 2xx without an access token.
    #[error("identity endpoint {endpoint} returned an empty access token")]
    EmptyAccessToken { endpoint: String },
}

fn upstream(code: &Option<String>, message: &Option<String>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!(": [{}] {}", code, message),
        (Some(code), None) => format!(": [{}]", code),
        (None, Some(message)) => format!(": {}", message),
        (None, None) => String::new(),
    }
}

/// Endpoint resolution errors.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Neither an override nor a table entry exists for the region.
    #[error("no {service} endpoint known for region '{region}'")]
    UnknownRegion { service: Service, region: String },
}

/// Transport-level errors, tagged with the URL being requested.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    /// Request timed out.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Any other failure while sending or reading the response.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// A non-2xx response from the resource service.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// HTTP method of the failing request.
    pub method: String,
    /// Full URL of the failing request.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Provider error code, if the body carried one.
    pub code: Option<String>,
    /// Human-readable message, if the body carried one.
    pub message: Option<String>,
    /// Raw response body.
    pub body: String,
}

impl HttpError {
    /// Provider codes that mean the access token is no longer accepted.
    const EXPIRED_CODES: [&'static str; 4] =
        ["InvalidToken", "ExpiredToken", "TokenExpired", "BXNIM0408E"];

    /// Check whether this response means the access token must be refreshed.
    pub fn is_auth_expired(&self) -> bool {
        self.status == 401
            || self
                .code
                .as_deref()
                .is_some_and(|code| Self::EXPIRED_CODES.contains(&code))
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} returned HTTP {}", self.method, self.url, self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        } else if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

/// A response body that could not be decoded into the requested shape.
#[derive(Debug, Error)]
#[error("malformed response from {url}: {reason}")]
pub struct DecodeError {
    pub url: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
