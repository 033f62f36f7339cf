//! Endpoint location.
//!
//! Resolution is a pure table lookup: an explicit per-service override wins,
//! otherwise the region is looked up in the table, otherwise
//! [`EndpointError::UnknownRegion`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EndpointError, Error};
use crate::types::EndpointUrl;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-south";

/// Regions covered by the public endpoint table.
pub const PUBLIC_REGIONS: [&str; 10] = [
    "us-south", "us-east", "eu-gb", "eu-de", "eu-fr2", "au-syd", "jp-tok", "jp-osa", "ca-tor",
    "br-sao",
];

const IAM_PUBLIC_ENDPOINT: &str = "https://iam.cloud.ibm.com";

/// A remote service the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// The Kubernetes container service.
    Container,
    /// The IAM identity service issuing tokens.
    Iam,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Container => "container",
            Service::Iam => "iam",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" | "cs" => Ok(Service::Container),
            "iam" => Ok(Service::Iam),
            other => Err(ConfigError::UnknownService {
                name: other.to_string(),
            }
            .into()),
        }
    }
}

/// Resolves the base URL for a service in a region.
///
/// # Example
///
/// ```
/// use cskit_core::{EndpointLocator, EndpointUrl, Service};
///
/// let locator = EndpointLocator::new()
///     .with_entry(Service::Container, "us-south", EndpointUrl::new("https://api.us-south.example").unwrap());
/// let url = locator.resolve(Service::Container, "us-south").unwrap();
/// assert_eq!(url.host(), Some("api.us-south.example"));
/// assert!(locator.resolve(Service::Container, "unknown-region").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EndpointLocator {
    overrides: HashMap<Service, EndpointUrl>,
    table: HashMap<Service, HashMap<String, EndpointUrl>>,
}

impl EndpointLocator {
    /// An empty locator with no overrides and no table entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// The public cloud table: regional container endpoints and the global
    /// IAM endpoint for every region in [`PUBLIC_REGIONS`].
    pub fn public() -> Self {
        let mut locator = Self::new();
        for region in PUBLIC_REGIONS {
            let container = format!("https://{}.containers.cloud.ibm.com", region);
            if let Ok(url) = EndpointUrl::new(&container) {
                locator = locator.with_entry(Service::Container, region, url);
            }
            if let Ok(url) = EndpointUrl::new(IAM_PUBLIC_ENDPOINT) {
                locator = locator.with_entry(Service::Iam, region, url);
            }
        }
        locator
    }

    /// Set an explicit override that wins over the table for `service`.
    pub fn with_override(mut self, service: Service, url: EndpointUrl) -> Self {
        self.overrides.insert(service, url);
        self
    }

    /// Add or replace the table entry for `service` in `region`.
    pub fn with_entry(
        mut self,
        service: Service,
        region: impl Into<String>,
        url: EndpointUrl,
    ) -> Self {
        self.table
            .entry(service)
            .or_default()
            .insert(region.into(), url);
        self
    }

    /// Resolve the base URL for `service` in `region`.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::UnknownRegion`] when there is neither an
    /// override nor a table entry.
    pub fn resolve(&self, service: Service, region: &str) -> Result<EndpointUrl, Error> {
        if let Some(url) = self.overrides.get(&service) {
            return Ok(url.clone());
        }

        self.table
            .get(&service)
            .and_then(|regions| regions.get(region))
            .cloned()
            .ok_or_else(|| {
                EndpointError::UnknownRegion {
                    service,
                    region: region.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> EndpointUrl {
        EndpointUrl::new(s).unwrap()
    }

    #[test]
    fn unknown_region_without_override() {
        let locator = EndpointLocator::new().with_entry(
            Service::Container,
            "us-south",
            url("https://api.us-south.example"),
        );
        let err = locator
            .resolve(Service::Container, "unknown-region")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Endpoint(EndpointError::UnknownRegion { service: Service::Container, ref region })
                if region == "unknown-region"
        ));
    }

    #[test]
    fn override_wins_regardless_of_region() {
        let locator = EndpointLocator::public()
            .with_override(Service::Container, url("https://override.example"));
        for region in ["us-south", "unknown-region", ""] {
            let resolved = locator.resolve(Service::Container, region).unwrap();
            assert_eq!(resolved.host(), Some("override.example"));
        }
    }

    #[test]
    fn override_is_per_service() {
        let locator = EndpointLocator::public()
            .with_override(Service::Container, url("https://override.example"));
        let iam = locator.resolve(Service::Iam, "eu-de").unwrap();
        assert_eq!(iam.host(), Some("iam.cloud.ibm.com"));
    }

    #[test]
    fn public_table_covers_regions() {
        let locator = EndpointLocator::public();
        for region in PUBLIC_REGIONS {
            let resolved = locator.resolve(Service::Container, region).unwrap();
            assert_eq!(
                resolved.host().map(str::to_string),
                Some(format!("{}.containers.cloud.ibm.com", region))
            );
        }
    }

    #[test]
    fn service_from_str() {
        assert_eq!("container".parse::<Service>().unwrap(), Service::Container);
        assert_eq!("iam".parse::<Service>().unwrap(), Service::Iam);
        assert!("cf".parse::<Service>().is_err());
    }
}
