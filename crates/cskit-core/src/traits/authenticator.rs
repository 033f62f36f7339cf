//! Token authenticator trait.

use async_trait::async_trait;

use crate::types::EndpointUrl;
use crate::{Credentials, RefreshToken, Result, TokenPair};

/// Obtains IAM token pairs from an identity endpoint.
///
/// Implementations perform exactly one network exchange per call and never
/// retry; they do not touch shared state. The caller stores the result.
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Exchange credentials for a new token pair.
    async fn authenticate(
        &self,
        identity_endpoint: &EndpointUrl,
        credentials: &Credentials,
    ) -> Result<TokenPair>;

    /// Exchange a refresh token for a new token pair.
    async fn refresh(
        &self,
        identity_endpoint: &EndpointUrl,
        refresh_token: &RefreshToken,
    ) -> Result<TokenPair>;
}
