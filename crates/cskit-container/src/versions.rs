//! Kubernetes version API.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cskit_core::{ApiPath, ApiRequest, AuthenticatedRequester, RequestTarget, Result};

/// Platform key for upstream Kubernetes in [`VersionMap`].
pub const PLATFORM_KUBERNETES: &str = "kubernetes";

/// A supported version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_service: Option<String>,
}

impl fmt::Display for KubeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Versions keyed by platform (`kubernetes`, `openshift`).
pub type VersionMap = BTreeMap<String, Vec<KubeVersion>>;

/// Version operations.
pub struct KubeVersions<'a> {
    requester: &'a dyn AuthenticatedRequester,
}

impl<'a> KubeVersions<'a> {
    pub(crate) fn new(requester: &'a dyn AuthenticatedRequester) -> Self {
        Self { requester }
    }

    /// Flat list of Kubernetes versions.
    pub async fn list(&self, target: &RequestTarget) -> Result<Vec<KubeVersion>> {
        debug!("Listing kube versions");
        self.requester
            .execute(ApiRequest::get(ApiPath::new("/v1/kube-versions")).with_target(target))
            .await?
            .json()
    }

    /// Versions for every platform.
    pub async fn list_v1(&self, target: &RequestTarget) -> Result<VersionMap> {
        debug!("Listing versions by platform");
        self.requester
            .execute(ApiRequest::get(ApiPath::new("/v1/versions")).with_target(target))
            .await?
            .json()
    }
}
