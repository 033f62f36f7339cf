//! Worker node API (VPC clusters).

use serde::{Deserialize, Serialize};
use tracing::debug;

use cskit_core::{ApiPath, ApiRequest, AuthenticatedRequester, RequestTarget, Result};

const GET_WORKERS: &str = "/v2/vpc/getWorkers";

/// A worker node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Worker {
    pub id: String,
    pub flavor: String,
    pub location: String,
    #[serde(rename = "poolid")]
    pub pool_id: String,
    pub pool_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<String>,
    #[serde(alias = "KubeVersion")]
    pub kube_version: KubeDetails,
    pub lifecycle: WorkerLifecycle,
    pub health: HealthStatus,
    pub network_interfaces: Vec<NetworkInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubeDetails {
    pub actual: String,
    pub desired: String,
    pub eos: String,
    pub master_eos: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub message: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerLifecycle {
    pub reason_for_delete: String,
    pub actual_state: String,
    pub desired_state: String,
    pub message: String,
    pub message_date: String,
    pub message_details: String,
    pub message_details_date: String,
    pub pending_operation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    pub cidr: String,
    pub ip_address: String,
    pub primary: bool,
    #[serde(rename = "subnetID")]
    pub subnet_id: String,
}

/// Worker operations.
pub struct Workers<'a> {
    requester: &'a dyn AuthenticatedRequester,
}

impl<'a> Workers<'a> {
    pub(crate) fn new(requester: &'a dyn AuthenticatedRequester) -> Self {
        Self { requester }
    }

    /// All workers of a cluster.
    pub async fn list_workers(
        &self,
        cluster: &str,
        show_deleted: bool,
        target: &RequestTarget,
    ) -> Result<Vec<Worker>> {
        self.fetch(cluster, None, show_deleted, target).await
    }

    /// Workers of one pool. An empty `pool` lists the whole cluster.
    pub async fn list_by_worker_pool(
        &self,
        cluster: &str,
        pool: &str,
        show_deleted: bool,
        target: &RequestTarget,
    ) -> Result<Vec<Worker>> {
        let pool = (!pool.is_empty()).then_some(pool);
        self.fetch(cluster, pool, show_deleted, target).await
    }

    async fn fetch(
        &self,
        cluster: &str,
        pool: Option<&str>,
        show_deleted: bool,
        target: &RequestTarget,
    ) -> Result<Vec<Worker>> {
        debug!(cluster = %cluster, pool = ?pool, "Listing workers");

        let mut path = ApiPath::new(GET_WORKERS)
            .query("cluster", cluster)
            .query("showDeleted", show_deleted);
        if let Some(pool) = pool {
            path = path.query("pool", pool);
        }

        self.requester
            .execute(ApiRequest::get(path).with_target(target))
            .await?
            .json()
    }
}
