//! Authenticated request capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ApiRequest, ApiResponse, Result};

/// Executes API requests with a valid bearer token attached.
///
/// This is the only capability resource APIs depend on. The REST client
/// implements it once; tests can substitute a fake.
#[async_trait]
pub trait AuthenticatedRequester: Send + Sync {
    /// Execute `request` against the configured service endpoint.
    ///
    /// Returns the 2xx response. Every other outcome is an error.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T> AuthenticatedRequester for Arc<T>
where
    T: AuthenticatedRequester + ?Sized,
{
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request).await
    }
}
