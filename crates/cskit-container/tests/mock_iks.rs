//! Resource API tests against a mock container service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cskit_container::{ClusterCreateRequest, ContainerService};
use cskit_core::{
    ApiRequest, ApiResponse, AuthenticatedRequester, Config, Credentials, EndpointUrl, Error,
    RequestTarget, Result, RetryPolicy,
};
use cskit_rest::RestClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_service(server: &MockServer) -> ContainerService {
    let url = EndpointUrl::new(&format!("http://127.0.0.1:{}", server.address().port())).unwrap();

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a1",
            "refresh_token": "r1",
            "expires_in": 3600
        })))
        .mount(server)
        .await;

    let config = Config::new(Credentials::api_key("k1"))
        .with_endpoint(url.clone())
        .with_iam_endpoint(url);
    let client = RestClient::connect(config).await.unwrap();
    ContainerService::new(Arc::new(client))
}

// ============================================================================
// Clusters
// ============================================================================

#[tokio::test]
async fn test_list_clusters() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/clusters"))
        .and(header("authorization", "Bearer a1"))
        .and(header("x-region", "us-south"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c1", "name": "prod", "state": "normal", "workerCount": 3, "dataCenter": "dal10"},
            {"id": "c2", "name": "dev", "state": "deploying", "workerCount": 1}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let target = RequestTarget::new().with_region("us-south");
    let clusters = service.clusters().list(&target).await.unwrap();

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].data_center, "dal10");
    assert_eq!(clusters[1].state, "deploying");
}

#[tokio::test]
async fn test_get_cluster_encodes_name() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/clusters/my%20cluster%2F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1", "name": "my cluster/1", "state": "normal"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cluster = service
        .clusters()
        .get("my cluster/1", &RequestTarget::new())
        .await
        .unwrap();

    assert_eq!(cluster.name, "my cluster/1");
}

#[tokio::test]
async fn test_create_and_delete_cluster() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/clusters"))
        .and(body_json(json!({
            "name": "prod",
            "dataCenter": "dal12",
            "machineType": "u2c.2x4",
            "workerNum": 1,
            "isolation": "public",
            "privateVlan": "",
            "publicVlan": "",
            "noSubnet": false,
            "diskEncryption": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c-new"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1/clusters/c-new"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let target = RequestTarget::new();
    let request = ClusterCreateRequest::new("prod", "dal12", "u2c.2x4", 1);
    let created = service.clusters().create(&request, &target).await.unwrap();
    assert_eq!(created.id, "c-new");

    service.clusters().delete(&created.id, &target).await.unwrap();
}

#[tokio::test]
async fn test_missing_cluster_is_http_error() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/clusters/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "E0006",
            "description": "The specified cluster could not be found."
        })))
        .mount(&server)
        .await;

    let err = service
        .clusters()
        .get("nope", &RequestTarget::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ============================================================================
// Workers, VLANs, versions, zones
// ============================================================================

#[tokio::test]
async fn test_list_workers() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/vpc/getWorkers"))
        .and(query_param("cluster", "c1"))
        .and(query_param("showDeleted", "true"))
        .and(query_param_is_missing("pool"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "w1", "flavor": "bx2.4x16", "poolName": "default", "health": {"state": "normal"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let workers = service
        .workers()
        .list_workers("c1", true, &RequestTarget::new())
        .await
        .unwrap();

    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].health.state, "normal");
}

#[tokio::test]
async fn test_list_workers_by_pool() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/vpc/getWorkers"))
        .and(query_param("cluster", "c1"))
        .and(query_param("showDeleted", "false"))
        .and(query_param("pool", "edge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let workers = service
        .workers()
        .list_by_worker_pool("c1", "edge", false, &RequestTarget::new())
        .await
        .unwrap();
    assert!(workers.is_empty());
}

#[tokio::test]
async fn test_list_vlans_and_versions() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/datacenters/dal10/vlans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "100", "type": "private", "properties": {"vlan_number": "1", "primary_router": "bcr01a.dal10"}}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/kube-versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"major": 1, "minor": 29, "patch": 4, "default": true}
        ])))
        .mount(&server)
        .await;

    let target = RequestTarget::new();
    let vlans = service.vlans().list("dal10", &target).await.unwrap();
    assert_eq!(vlans[0].descriptor(), "100-1-bcr01a.dal10");

    let versions = service.kube_versions().list(&target).await.unwrap();
    assert_eq!(versions[0].to_string(), "1.29.4");
}

#[tokio::test]
async fn test_malformed_zone_list() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": 1"))
        .mount(&server)
        .await;

    let err = service.zones().list(&RequestTarget::new()).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

// ============================================================================
// Zone configuration report
// ============================================================================

async fn mount_zone(server: &MockServer, zone: &str, vlans: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/datacenters/{}/machine-types", zone)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "u2c.2x4", "serverType": "virtual"},
            {"name": "b3c.4x16", "serverType": "virtual"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/datacenters/{}/vlans", zone)))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_zone_config_report() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "dal10", "metro": "dal"},
            {"id": "fra02", "metro": "fra"}
        ])))
        .mount(&server)
        .await;

    mount_zone(
        &server,
        "dal10",
        json!([
            {"id": "1", "type": "public", "properties": {"vlan_number": "100", "primary_router": "fcr01a.dal10"}},
            {"id": "2", "type": "private", "properties": {"vlan_number": "200", "primary_router": "bcr01a.dal10"}}
        ]),
    )
    .await;
    mount_zone(&server, "fra02", json!([])).await;

    Mock::given(method("GET"))
        .and(path("/v1/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kubernetes": [
                {"major": 1, "minor": 29, "patch": 4},
                {"major": 1, "minor": 30, "patch": 1, "default": true}
            ],
            "openshift": [{"major": 4, "minor": 15, "patch": 9}]
        })))
        .mount(&server)
        .await;

    let report = service
        .zone_config()
        .build(&RequestTarget::new())
        .await
        .unwrap();

    assert_eq!(report.k8s_versions, ["1.29.4", "1.30.1"]);
    assert_eq!(report.zones.len(), 2);

    let dal10 = &report.zones[0];
    assert_eq!(dal10.id, "dal10");
    assert_eq!(dal10.metro, "dal");
    assert_eq!(dal10.public_vlans, ["1-100-fcr01a.dal10"]);
    assert_eq!(dal10.private_vlans, ["2-200-bcr01a.dal10"]);
    assert_eq!(dal10.server_types, ["u2c.2x4", "b3c.4x16"]);

    assert_eq!(report.zones[1].id, "fra02");
    assert!(report.zones[1].public_vlans.is_empty());
}

#[tokio::test]
async fn test_zone_config_rejects_unknown_vlan_type() {
    let server = MockServer::start().await;
    let service = mock_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "dal10", "metro": "dal"}
        ])))
        .mount(&server)
        .await;

    mount_zone(
        &server,
        "dal10",
        json!([{"id": "9", "type": "transit", "properties": {}}]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/v1/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = service
        .zone_config()
        .build(&RequestTarget::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

// ============================================================================
// Polling with a scripted requester
// ============================================================================

/// Answers cluster gets with a fixed sequence of states.
struct ScriptedRequester {
    states: Mutex<Vec<&'static str>>,
    calls: Mutex<usize>,
}

impl ScriptedRequester {
    fn new(mut states: Vec<&'static str>) -> Self {
        states.reverse();
        Self {
            states: Mutex::new(states),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl AuthenticatedRequester for ScriptedRequester {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        *self.calls.lock().unwrap() += 1;
        let state = {
            let mut states = self.states.lock().unwrap();
            if states.len() > 1 {
                states.pop().unwrap()
            } else {
                states[0]
            }
        };
        let body = json!({"id": "c1", "name": "prod", "state": state});
        Ok(ApiResponse::new(
            200,
            request.path().to_string(),
            serde_json::to_vec(&body).unwrap(),
        ))
    }
}

fn quick_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn test_wait_for_state_stops_when_reached() {
    let requester = Arc::new(ScriptedRequester::new(vec!["deploying", "deploying", "normal"]));
    let service = ContainerService::new(requester.clone());

    let cluster = service
        .clusters()
        .wait_for_state("c1", "normal", quick_policy(5), &RequestTarget::new())
        .await
        .unwrap();

    assert_eq!(cluster.state, "normal");
    assert_eq!(requester.calls(), 3);
}

#[tokio::test]
async fn test_wait_for_state_bounded_by_policy() {
    let requester = Arc::new(ScriptedRequester::new(vec!["deploying"]));
    let service = ContainerService::new(requester.clone());

    let cluster = service
        .clusters()
        .wait_for_state("c1", "normal", quick_policy(2), &RequestTarget::new())
        .await
        .unwrap();

    assert_eq!(cluster.state, "deploying");
    assert_eq!(requester.calls(), 3);
}
