//! Zone and machine type API.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cskit_core::{ApiPath, ApiRequest, AuthenticatedRequester, RequestTarget, Result};

/// A zone that can host workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zone {
    pub id: String,
    pub metro: String,
}

/// A worker machine type offered in a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Flavor {
    pub name: String,
    pub provider: String,
    pub memory: String,
    pub network_speed: String,
    pub cores: String,
    pub os: String,
    pub server_type: String,
    pub storage: String,
    pub secondary_storage: String,
    pub secondary_storage_encrypted: bool,
    pub deprecated: bool,
    pub corresponding_machine_type: String,
    pub is_trusted: bool,
    pub gpus: String,
}

/// Zone operations.
pub struct Zones<'a> {
    requester: &'a dyn AuthenticatedRequester,
}

impl<'a> Zones<'a> {
    pub(crate) fn new(requester: &'a dyn AuthenticatedRequester) -> Self {
        Self { requester }
    }

    pub async fn list(&self, target: &RequestTarget) -> Result<Vec<Zone>> {
        debug!("Listing zones");
        self.requester
            .execute(ApiRequest::get(ApiPath::new("/v1/zones")).with_target(target))
            .await?
            .json()
    }

    pub async fn machine_types(&self, zone: &str, target: &RequestTarget) -> Result<Vec<Flavor>> {
        debug!(zone = %zone, "Listing machine types");
        let path = ApiPath::new("/v1/datacenters")
            .segment(zone)
            .segment("machine-types");

        self.requester
            .execute(ApiRequest::get(path).with_target(target))
            .await?
            .json()
    }
}
