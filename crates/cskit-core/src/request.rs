//! Request and response shapes for authenticated API calls.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DecodeError, Error};
use crate::types::RequestTarget;

/// HTTP method of an API request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API path relative to a service endpoint, with query parameters.
///
/// Literal segments come from [`ApiPath::new`]; caller-supplied values such
/// as cluster names go through [`ApiPath::segment`] so they are encoded as a
/// single segment when the URL is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ApiPath {
    /// Parse a literal path such as `/v1/clusters`.
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
        }
    }

    /// Append one segment. The value is encoded as a whole, `/` included.
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// A request handed to an [`AuthenticatedRequester`](crate::AuthenticatedRequester).
///
/// Authorization is not part of the request; the requester attaches it.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    path: ApiPath,
    target: RequestTarget,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: ApiPath) -> Self {
        Self {
            method,
            path,
            target: RequestTarget::default(),
            body: None,
        }
    }

    pub fn get(path: ApiPath) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: ApiPath) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: ApiPath) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: ApiPath) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_target(mut self, target: &RequestTarget) -> Self {
        self.target = target.clone();
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if `body` cannot be serialized.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Encode)?);
        Ok(self)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &ApiPath {
        &self.path
    }

    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// A successful (2xx) response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    status: u16,
    url: String,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            url: url.into(),
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for an empty or malformed body; a malformed
    /// response never decodes to an empty value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body)
            .map_err(|e| DecodeError::new(self.url.clone(), e.to_string()).into())
    }

    /// Discard the body. For calls that return nothing of interest.
    pub fn ok(self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Cluster {
        id: String,
        name: String,
        #[serde(rename = "workerCount")]
        worker_count: u32,
    }

    #[test]
    fn path_display_includes_query() {
        let path = ApiPath::new("/v2/vpc/getWorkers")
            .query("cluster", "c1")
            .query("showDeleted", false);
        assert_eq!(
            path.to_string(),
            "/v2/vpc/getWorkers?cluster=c1&showDeleted=false"
        );
    }

    #[test]
    fn path_ignores_redundant_slashes() {
        assert_eq!(ApiPath::new("//v1//clusters/").segments(), ["v1", "clusters"]);
    }

    #[test]
    fn decodes_array_with_all_fields() {
        let body = br#"[{"id":"c1","name":"prod","workerCount":3},{"id":"c2","name":"dev","workerCount":1}]"#;
        let response = ApiResponse::new(200, "https://api.example/v1/clusters", body.to_vec());
        let clusters: Vec<Cluster> = response.json().unwrap();
        assert_eq!(
            clusters,
            vec![
                Cluster {
                    id: "c1".to_string(),
                    name: "prod".to_string(),
                    worker_count: 3,
                },
                Cluster {
                    id: "c2".to_string(),
                    name: "dev".to_string(),
                    worker_count: 1,
                },
            ]
        );
    }

    #[test]
    fn malformed_body_is_decode_failure() {
        let response = ApiResponse::new(200, "https://api.example/v1/clusters", b"[{".to_vec());
        let err = response.json::<Vec<Cluster>>().unwrap_err();
        assert!(matches!(err, Error::Decode(ref e) if e.url.ends_with("/v1/clusters")));
    }

    #[test]
    fn empty_body_is_decode_failure() {
        let response = ApiResponse::new(200, "https://api.example/v1/clusters", Vec::new());
        assert!(matches!(
            response.json::<Vec<Cluster>>(),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn with_json_sets_body() {
        let request = ApiRequest::post(ApiPath::new("/v1/clusters"))
            .with_json(&serde_json::json!({"name": "prod"}))
            .unwrap();
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.body().unwrap()["name"], "prod");
    }
}
