//! HTTP transport for resource-service requests.

use reqwest::header::ACCEPT;
use tracing::{debug, trace};

use cskit_core::error::{ConfigError, HttpError};
use cskit_core::{AccessToken, ApiRequest, ApiResponse, Config, EndpointUrl, Error, Method};

use crate::errors::{parse_error_body, transport_error};

/// Result of a single send, tagged so the retry wrapper can switch on it.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// 2xx response.
    Complete(ApiResponse),
    /// The service rejected the access token.
    AuthExpired(HttpError),
    /// Any other failure: transport, or a non-auth HTTP error.
    Failed(Error),
}

/// Build the reqwest client shared by the transport and the IAM
/// authenticator.
pub(crate) fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| {
            ConfigError::HttpClient {
                reason: e.to_string(),
            }
            .into()
        })
}

/// HTTP client for resource-service requests.
///
/// Attaches the bearer token, target headers and JSON body; classifies the
/// response. Never retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the configured user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the client cannot be built.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub(crate) async fn send(
        &self,
        base: &EndpointUrl,
        request: &ApiRequest,
        token: &AccessToken,
    ) -> Outcome {
        let url = base.join(request.path());
        let url_str = url.to_string();
        debug!(method = %request.method(), url = %url_str, "sending request");

        let mut builder = self
            .client
            .request(to_reqwest(request.method()), url)
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json");

        for (name, value) in request.target().headers() {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Outcome::Failed(transport_error(&url_str, e).into()),
        };

        let status = response.status();
        trace!(status = %status, "response");

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return Outcome::Failed(transport_error(&url_str, e).into()),
        };

        if status.is_success() {
            return Outcome::Complete(ApiResponse::new(status.as_u16(), url_str, body));
        }

        let details = parse_error_body(&body);
        let error = HttpError {
            method: request.method().to_string(),
            url: url_str,
            status: status.as_u16(),
            code: details.code,
            message: details.message,
            body: String::from_utf8_lossy(&body).into_owned(),
        };

        if error.is_auth_expired() {
            Outcome::AuthExpired(error)
        } else {
            Outcome::Failed(error.into())
        }
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}
