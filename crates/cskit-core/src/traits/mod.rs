//! Seams between the core and its network-facing implementations.

mod authenticator;
mod requester;

pub use authenticator::TokenAuthenticator;
pub use requester::AuthenticatedRequester;
