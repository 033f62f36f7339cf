//! Zone configuration report.
//!
//! For every zone: the machine type names and the public and private VLAN
//! descriptors (`id-number-router`). Plus the available Kubernetes versions.

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use cskit_core::error::DecodeError;
use cskit_core::{RequestTarget, Result};

use crate::ContainerService;
use crate::versions::PLATFORM_KUBERNETES;
use crate::vlans::{DatacenterVlan, VLAN_TYPE_PRIVATE, VLAN_TYPE_PUBLIC};
use crate::zones::Zone;

/// The assembled report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneReport {
    #[serde(rename = "k8sVersions")]
    pub k8s_versions: Vec<String>,
    pub zones: Vec<ZoneEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub id: String,
    pub metro: String,
    pub public_vlans: Vec<String>,
    pub private_vlans: Vec<String>,
    #[serde(rename = "serverTypes")]
    pub server_types: Vec<String>,
}

/// Builds a [`ZoneReport`] from the zone, machine type, VLAN and version
/// APIs.
pub struct ZoneConfig<'a> {
    service: &'a ContainerService,
}

impl<'a> ZoneConfig<'a> {
    pub(crate) fn new(service: &'a ContainerService) -> Self {
        Self { service }
    }

    /// Fetch everything and assemble the report.
    ///
    /// Zones are queried concurrently and reported in the order the service
    /// lists them. Any failed call, or a VLAN that is neither public nor
    /// private, fails the whole report.
    #[instrument(skip(self, target))]
    pub async fn build(&self, target: &RequestTarget) -> Result<ZoneReport> {
        let zones = self.service.zones().list(target).await?;
        info!(count = zones.len(), "Assembling zone configuration");

        let entries = try_join_all(zones.iter().map(|zone| self.zone_entry(zone, target))).await?;

        let versions = self.service.kube_versions().list_v1(target).await?;
        let k8s_versions = versions
            .get(PLATFORM_KUBERNETES)
            .map(|list| list.iter().map(ToString::to_string).collect())
            .unwrap_or_default();

        Ok(ZoneReport {
            k8s_versions,
            zones: entries,
        })
    }

    async fn zone_entry(&self, zone: &Zone, target: &RequestTarget) -> Result<ZoneEntry> {
        let flavors = self.service.zones().machine_types(&zone.id, target).await?;
        let vlans = self.service.vlans().list(&zone.id, target).await?;
        debug!(zone = %zone.id, flavors = flavors.len(), vlans = vlans.len(), "Zone fetched");

        let (public_vlans, private_vlans) = split_vlans(&zone.id, &vlans)?;

        Ok(ZoneEntry {
            id: zone.id.clone(),
            metro: zone.metro.clone(),
            public_vlans,
            private_vlans,
            server_types: flavors.into_iter().map(|f| f.name).collect(),
        })
    }
}

/// Partition VLANs into public and private descriptors.
fn split_vlans(zone: &str, vlans: &[DatacenterVlan]) -> Result<(Vec<String>, Vec<String>)> {
    let mut public = Vec::new();
    let mut private = Vec::new();

    for vlan in vlans {
        match vlan.vlan_type.as_str() {
            VLAN_TYPE_PUBLIC => public.push(vlan.descriptor()),
            VLAN_TYPE_PRIVATE => private.push(vlan.descriptor()),
            other => {
                return Err(DecodeError::new(
                    format!("/v1/datacenters/{}/vlans", zone),
                    format!("unknown VLAN type '{}' for VLAN {}", other, vlan.id),
                )
                .into());
            }
        }
    }

    Ok((public, private))
}
