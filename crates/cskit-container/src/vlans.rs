//! Datacenter VLAN API.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cskit_core::{ApiPath, ApiRequest, AuthenticatedRequester, RequestTarget, Result};

pub const VLAN_TYPE_PUBLIC: &str = "public";
pub const VLAN_TYPE_PRIVATE: &str = "private";

/// A VLAN available in a datacenter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatacenterVlan {
    pub id: String,
    #[serde(rename = "type")]
    pub vlan_type: String,
    pub properties: VlanProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlanProperties {
    pub name: String,
    pub note: String,
    pub primary_router: String,
    pub vlan_number: String,
    pub vlan_type: String,
    pub location: String,
    pub local_disk_storage_capability: String,
    pub san_storage_capability: String,
}

impl DatacenterVlan {
    /// `id-number-router`, the form used in zone configuration reports.
    pub fn descriptor(&self) -> String {
        format!(
            "{}-{}-{}",
            self.id, self.properties.vlan_number, self.properties.primary_router
        )
    }
}

/// VLAN operations.
pub struct Vlans<'a> {
    requester: &'a dyn AuthenticatedRequester,
}

impl<'a> Vlans<'a> {
    pub(crate) fn new(requester: &'a dyn AuthenticatedRequester) -> Self {
        Self { requester }
    }

    pub async fn list(&self, datacenter: &str, target: &RequestTarget) -> Result<Vec<DatacenterVlan>> {
        debug!(datacenter = %datacenter, "Listing VLANs");
        let path = ApiPath::new("/v1/datacenters")
            .segment(datacenter)
            .segment("vlans");

        self.requester
            .execute(ApiRequest::get(path).with_target(target))
            .await?
            .json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_joins_id_number_router() {
        let vlan: DatacenterVlan = serde_json::from_str(
            r#"{"id":"2234945","type":"public","properties":{"name":"","primary_router":"fcr01a.dal10","vlan_number":"1462","vlan_type":"standard"}}"#,
        )
        .unwrap();

        assert_eq!(vlan.vlan_type, VLAN_TYPE_PUBLIC);
        assert_eq!(vlan.descriptor(), "2234945-1462-fcr01a.dal10");
    }
}
