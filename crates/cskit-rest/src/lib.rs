//! cskit-rest - IAM session and authenticated REST client.
//!
//! [`Session`] owns the credential store and collapses concurrent token
//! refreshes into one. [`RestClient`] implements
//! [`AuthenticatedRequester`](cskit_core::AuthenticatedRequester) on top of
//! it, retrying a call once with a forced refresh when the service rejects
//! the token.
//!
//! # Example
//!
//! ```no_run
//! use cskit_core::{ApiPath, ApiRequest, AuthenticatedRequester, Config, Credentials};
//! use cskit_rest::RestClient;
//!
//! # async fn example() -> Result<(), cskit_core::Error> {
//! let config = Config::new(Credentials::api_key("my-api-key")).with_region("us-south");
//! let client = RestClient::connect(config).await?;
//!
//! let response = client.execute(ApiRequest::get(ApiPath::new("/v1/clusters"))).await?;
//! let clusters: Vec<serde_json::Value> = response.json()?;
//! println!("{} clusters", clusters.len());
//! # Ok(())
//! # }
//! ```

mod errors;
mod iam;
mod rest;
mod session;
mod transport;

pub use iam::IamAuthenticator;
pub use rest::RestClient;
pub use session::Session;
pub use transport::HttpTransport;
