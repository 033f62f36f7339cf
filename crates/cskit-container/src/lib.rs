//! cskit-container - Resource APIs for the Kubernetes container service.
//!
//! Each API is a thin set of typed calls over an
//! [`AuthenticatedRequester`]: build the path, attach the target headers,
//! decode the JSON body. Authentication, token refresh and transport errors
//! are the requester's concern.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cskit_container::ContainerService;
//! use cskit_core::{Config, Credentials, RequestTarget};
//! use cskit_rest::RestClient;
//!
//! # async fn example() -> Result<(), cskit_core::Error> {
//! let client = RestClient::connect(Config::new(Credentials::api_key("my-api-key"))).await?;
//! let service = ContainerService::new(Arc::new(client));
//!
//! for cluster in service.clusters().list(&RequestTarget::new()).await? {
//!     println!("{} {}", cluster.name, cluster.state);
//! }
//! # Ok(())
//! # }
//! ```

pub mod clusters;
pub mod versions;
pub mod vlans;
pub mod workers;
pub mod zone_config;
pub mod zones;

use std::sync::Arc;

use cskit_core::AuthenticatedRequester;

pub use clusters::{ClusterCreateRequest, ClusterCreateResponse, ClusterInfo, Clusters};
pub use versions::{KubeVersion, KubeVersions, VersionMap};
pub use vlans::{DatacenterVlan, VlanProperties, Vlans};
pub use workers::{Worker, Workers};
pub use zone_config::{ZoneConfig, ZoneEntry, ZoneReport};
pub use zones::{Flavor, Zone, Zones};

/// Entry point to the container-service resource APIs.
#[derive(Clone)]
pub struct ContainerService {
    requester: Arc<dyn AuthenticatedRequester>,
}

impl ContainerService {
    pub fn new(requester: Arc<dyn AuthenticatedRequester>) -> Self {
        Self { requester }
    }

    pub fn clusters(&self) -> Clusters<'_> {
        Clusters::new(self.requester.as_ref())
    }

    pub fn workers(&self) -> Workers<'_> {
        Workers::new(self.requester.as_ref())
    }

    pub fn vlans(&self) -> Vlans<'_> {
        Vlans::new(self.requester.as_ref())
    }

    pub fn kube_versions(&self) -> KubeVersions<'_> {
        KubeVersions::new(self.requester.as_ref())
    }

    pub fn zones(&self) -> Zones<'_> {
        Zones::new(self.requester.as_ref())
    }

    /// Assemble the per-zone machine type and VLAN report.
    pub fn zone_config(&self) -> ZoneConfig<'_> {
        ZoneConfig::new(self)
    }
}

impl std::fmt::Debug for ContainerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerService").finish_non_exhaustive()
    }
}
