//! cskit-core - Core types and traits for the container-service client.
//!
//! This crate holds everything that does not touch the network: the error
//! taxonomy, credentials and token types, the in-memory credential store,
//! the endpoint locator, configuration, and the two seams the rest of the
//! workspace plugs into ([`TokenAuthenticator`] and [`AuthenticatedRequester`]).

pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::{Config, RetryPolicy};
pub use credentials::Credentials;
pub use endpoints::{DEFAULT_REGION, EndpointLocator, Service};
pub use error::Error;
pub use request::{ApiPath, ApiRequest, ApiResponse, Method};
pub use store::CredentialStore;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{AuthenticatedRequester, TokenAuthenticator};
pub use types::{EndpointUrl, RequestTarget};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
