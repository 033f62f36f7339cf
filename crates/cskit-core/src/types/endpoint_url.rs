//! Service endpoint URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, Error};
use crate::request::ApiPath;

/// A validated service base URL.
///
/// The URL must be absolute and use HTTPS; plain HTTP is accepted only for
/// loopback hosts so tests can run against a local mock server.
///
/// # Example
///
/// ```
/// use cskit_core::{ApiPath, EndpointUrl};
///
/// let base = EndpointUrl::new("https://us-south.containers.cloud.ibm.com/").unwrap();
/// let url = base.join(&ApiPath::new("/v1/clusters").segment("my cluster"));
/// assert_eq!(url.as_str(), "https://us-south.containers.cloud.ibm.com/v1/clusters/my%20cluster");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointUrl(Url);

impl EndpointUrl {
    /// Create a new endpoint URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL is malformed or not
    /// allowed.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Build the full URL for an API path under this base.
    ///
    /// Path segments are percent-encoded; a trailing slash on the base is
    /// ignored.
    pub fn join(&self, path: &ApiPath) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.segments());
        }
        if !path.query_pairs().is_empty() {
            url.query_pairs_mut().extend_pairs(path.query_pairs());
        }
        url
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            ConfigError::InvalidUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        let scheme = url.scheme();
        let is_loopback = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_loopback) {
            return Err(invalid("must use HTTPS (HTTP allowed only for localhost)"));
        }

        if url.host_str().is_none() {
            return Err(invalid("must have a host"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        Ok(())
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EndpointUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for EndpointUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for EndpointUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EndpointUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let url = EndpointUrl::new("https://iam.cloud.ibm.com").unwrap();
        assert_eq!(url.host(), Some("iam.cloud.ibm.com"));
    }

    #[test]
    fn valid_localhost_http() {
        let url = EndpointUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.host(), Some("127.0.0.1"));
    }

    #[test]
    fn join_with_and_without_trailing_slash() {
        let path = ApiPath::new("/v1/clusters");
        for base in [
            "https://api.us-south.example",
            "https://api.us-south.example/",
        ] {
            let url = EndpointUrl::new(base).unwrap().join(&path);
            assert_eq!(url.as_str(), "https://api.us-south.example/v1/clusters");
        }
    }

    #[test]
    fn join_keeps_base_prefix_and_query() {
        let base = EndpointUrl::new("https://gateway.example/containers").unwrap();
        let path = ApiPath::new("/v2/vpc/getWorkers")
            .query("cluster", "c1")
            .query("showDeleted", "false");
        assert_eq!(
            base.join(&path).as_str(),
            "https://gateway.example/containers/v2/vpc/getWorkers?cluster=c1&showDeleted=false"
        );
    }

    #[test]
    fn segment_is_percent_encoded() {
        let base = EndpointUrl::new("https://api.example").unwrap();
        let path = ApiPath::new("/v1/clusters").segment("a/b?c");
        assert_eq!(
            base.join(&path).as_str(),
            "https://api.example/v1/clusters/a%2Fb%3Fc"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(EndpointUrl::new("http://iam.cloud.ibm.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(EndpointUrl::new("/v1/clusters").is_err());
    }

    #[test]
    fn deserializes_from_string() {
        let url: EndpointUrl = serde_json::from_str("\"https://iam.cloud.ibm.com\"").unwrap();
        assert_eq!(url.host(), Some("iam.cloud.ibm.com"));
        assert!(serde_json::from_str::<EndpointUrl>("\"ftp://x\"").is_err());
    }
}
