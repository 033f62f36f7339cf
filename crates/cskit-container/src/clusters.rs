//! Cluster API.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use cskit_core::{
    ApiPath, ApiRequest, AuthenticatedRequester, RequestTarget, Result, RetryPolicy,
};

const CLUSTERS: &str = "/v1/clusters";

/// State reported by a cluster whose master and workers are ready.
pub const STATE_NORMAL: &str = "normal";

/// A cluster as returned by the list and get calls.
///
/// Fields the service omits are left at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterInfo {
    pub id: String,
    pub name: String,
    pub state: String,
    pub region: String,
    pub data_center: String,
    pub location: String,
    pub created_date: String,
    pub modified_date: String,
    pub master_kube_version: String,
    #[serde(rename = "serverURL")]
    pub server_url: String,
    pub ingress_hostname: String,
    pub ingress_secret_name: String,
    #[serde(rename = "resourceGroup")]
    pub resource_group_id: String,
    pub worker_count: u32,
    pub is_paid: bool,
    pub is_trusted: bool,
    pub owner_email: String,
    pub vlans: Vec<ClusterVlan>,
}

/// A VLAN attached to a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterVlan {
    pub id: String,
    pub zone: String,
    pub subnets: Vec<ClusterSubnet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterSubnet {
    pub id: String,
    pub cidr: String,
    pub is_public: bool,
    pub is_byoip: bool,
}

/// Body of a cluster create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCreateRequest {
    pub name: String,
    pub data_center: String,
    pub machine_type: String,
    pub worker_num: u32,
    pub isolation: String,
    pub private_vlan: String,
    pub public_vlan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_version: Option<String>,
    pub no_subnet: bool,
    pub disk_encryption: bool,
}

impl ClusterCreateRequest {
    /// A request with the required fields set and public isolation.
    pub fn new(
        name: impl Into<String>,
        data_center: impl Into<String>,
        machine_type: impl Into<String>,
        worker_num: u32,
    ) -> Self {
        Self {
            name: name.into(),
            data_center: data_center.into(),
            machine_type: machine_type.into(),
            worker_num,
            isolation: "public".to_string(),
            disk_encryption: true,
            ..Self::default()
        }
    }

    pub fn with_vlans(mut self, public: impl Into<String>, private: impl Into<String>) -> Self {
        self.public_vlan = public.into();
        self.private_vlan = private.into();
        self
    }

    pub fn with_master_version(mut self, version: impl Into<String>) -> Self {
        self.master_version = Some(version.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCreateResponse {
    pub id: String,
}

/// Cluster operations.
pub struct Clusters<'a> {
    requester: &'a dyn AuthenticatedRequester,
}

impl<'a> Clusters<'a> {
    pub(crate) fn new(requester: &'a dyn AuthenticatedRequester) -> Self {
        Self { requester }
    }

    pub async fn list(&self, target: &RequestTarget) -> Result<Vec<ClusterInfo>> {
        debug!("Listing clusters");
        self.requester
            .execute(ApiRequest::get(ApiPath::new(CLUSTERS)).with_target(target))
            .await?
            .json()
    }

    /// Fetch one cluster by id or name.
    pub async fn get(&self, id_or_name: &str, target: &RequestTarget) -> Result<ClusterInfo> {
        debug!(cluster = %id_or_name, "Getting cluster");
        self.requester
            .execute(ApiRequest::get(ApiPath::new(CLUSTERS).segment(id_or_name)).with_target(target))
            .await?
            .json()
    }

    #[instrument(skip(self, request, target), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: &ClusterCreateRequest,
        target: &RequestTarget,
    ) -> Result<ClusterCreateResponse> {
        let created: ClusterCreateResponse = self
            .requester
            .execute(
                ApiRequest::post(ApiPath::new(CLUSTERS))
                    .with_target(target)
                    .with_json(request)?,
            )
            .await?
            .json()?;

        info!(id = %created.id, "Cluster created");
        Ok(created)
    }

    #[instrument(skip(self, target))]
    pub async fn delete(&self, id_or_name: &str, target: &RequestTarget) -> Result<()> {
        self.requester
            .execute(
                ApiRequest::delete(ApiPath::new(CLUSTERS).segment(id_or_name)).with_target(target),
            )
            .await?
            .ok()?;

        info!("Cluster deleted");
        Ok(())
    }

    /// Poll the cluster until it reports `state`, at most
    /// `policy.max_retries + 1` times with `policy.delay` between polls.
    ///
    /// Returns the last observed cluster; the caller checks whether it
    /// reached `state`. Request errors end the wait immediately.
    #[instrument(skip(self, policy, target))]
    pub async fn wait_for_state(
        &self,
        id_or_name: &str,
        state: &str,
        policy: RetryPolicy,
        target: &RequestTarget,
    ) -> Result<ClusterInfo> {
        let mut attempt = 0;
        loop {
            let cluster = self.get(id_or_name, target).await?;
            if cluster.state == state || attempt >= policy.max_retries {
                return Ok(cluster);
            }

            attempt += 1;
            debug!(attempt, current = %cluster.state, "Cluster not ready, waiting");
            tokio::time::sleep(policy.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_wire_names() {
        let request = ClusterCreateRequest::new("prod", "dal10", "u2c.2x4", 2)
            .with_vlans("pub-1", "priv-1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["dataCenter"], "dal10");
        assert_eq!(value["machineType"], "u2c.2x4");
        assert_eq!(value["workerNum"], 2);
        assert_eq!(value["publicVlan"], "pub-1");
        assert_eq!(value["privateVlan"], "priv-1");
        assert_eq!(value["isolation"], "public");
        assert_eq!(value["diskEncryption"], true);
        assert!(value.get("billing").is_none());
        assert!(value.get("masterVersion").is_none());
    }

    #[test]
    fn cluster_info_tolerates_missing_fields() {
        let cluster: ClusterInfo = serde_json::from_str(
            r#"{"id":"c1","name":"prod","state":"deploying","workerCount":3,"serverURL":"https://c1.example:30000","resourceGroup":"rg1","unknownField":1}"#,
        )
        .unwrap();

        assert_eq!(cluster.id, "c1");
        assert_eq!(cluster.worker_count, 3);
        assert_eq!(cluster.server_url, "https://c1.example:30000");
        assert_eq!(cluster.resource_group_id, "rg1");
        assert!(cluster.vlans.is_empty());
        assert!(cluster.data_center.is_empty());
    }
}
