//! Authenticated REST client with one forced-refresh retry.

use async_trait::async_trait;
use tracing::{instrument, warn};

use cskit_core::error::AuthError;
use cskit_core::{
    ApiRequest, ApiResponse, AuthenticatedRequester, Config, Error, Result,
};

use crate::session::Session;
use crate::transport::{HttpTransport, Outcome};

/// REST client for the container service.
///
/// Every request carries the session's current bearer token. When the
/// service rejects it as expired, the client forces one refresh and resends
/// once. Nothing else is retried.
#[derive(Debug, Clone)]
pub struct RestClient {
    session: Session,
    transport: HttpTransport,
}

impl RestClient {
    /// Create a client over an existing session.
    pub fn new(session: Session) -> Result<Self> {
        let transport = HttpTransport::new(session.config())?;
        Ok(Self { session, transport })
    }

    /// Create a client with a caller-built transport.
    pub fn with_transport(session: Session, transport: HttpTransport) -> Self {
        Self { session, transport }
    }

    /// Authenticate with `config` and return a ready client.
    pub async fn connect(config: Config) -> Result<Self> {
        let session = Session::connect(config).await?;
        Self::new(session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[async_trait]
impl AuthenticatedRequester for RestClient {
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let endpoint = self.session.endpoint();
        let lease = self.session.lease().await?;

        let rejected = match self.transport.send(endpoint, &request, &lease.token).await {
            Outcome::Complete(response) => return Ok(response),
            Outcome::Failed(err) => return Err(err),
            Outcome::AuthExpired(err) => err,
        };

        warn!(
            status = rejected.status,
            code = rejected.code.as_deref().unwrap_or(""),
            "Token rejected, forcing refresh"
        );
        let lease = self.session.force_refresh_from(lease.generation).await?;

        match self.transport.send(endpoint, &request, &lease.token).await {
            Outcome::Complete(response) => Ok(response),
            Outcome::Failed(err) => Err(err),
            Outcome::AuthExpired(err) => Err(Error::Auth(AuthError::TokenRejected {
                url: err.url,
                status: err.status,
                message: err.message,
            })),
        }
    }
}
