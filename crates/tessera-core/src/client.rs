//! HTTP client for the Tessera control-plane REST API.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{CoreError, Result};
use crate::manifest::DeploymentConfig;
use crate::node::{EvacuationReport, NodeStatus, PodInfo};
use crate::policy::{PolicyFile, RoleBindingChange, WhoCanResult};
use crate::project::{Project, ProjectRequest};

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Error envelope returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the control-plane API.
///
/// Thin by design: every method is one request plus envelope handling. All
/// policy evaluation, pruning decisions, and node reconciliation happen
/// server-side.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tesseradm/", env!("CARGO_PKG_VERSION")));
        if config.insecure_skip_tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(ca) = &config.certificate_authority {
            let pem = std::fs::read(ca)?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: normalize_url(&config.server),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, format!("{}{}", self.base_url, endpoint));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(CoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn expect_success(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(CoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.request(reqwest::Method::GET, endpoint).send().await?;
        Self::handle_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let response = self
            .request(reqwest::Method::POST, endpoint)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn post_no_content<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, endpoint)
            .json(body)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    // Projects

    pub async fn create_project(&self, request: &ProjectRequest) -> Result<Project> {
        self.post("/apis/projects", request).await
    }

    // Policy

    pub async fn add_role_binding(
        &self,
        namespace: &str,
        change: &RoleBindingChange,
    ) -> Result<()> {
        self.post_no_content(&format!("/apis/namespaces/{namespace}/rolebindings"), change)
            .await
    }

    pub async fn remove_role_binding(
        &self,
        namespace: &str,
        change: &RoleBindingChange,
    ) -> Result<()> {
        let endpoint = format!(
            "/apis/namespaces/{namespace}/rolebindings/{}?subjectKind={}&subjectName={}",
            change.role, change.subject_kind, change.subject_name
        );
        let response = self.request(reqwest::Method::DELETE, &endpoint).send().await?;
        Self::expect_success(response).await
    }

    pub async fn who_can(
        &self,
        namespace: &str,
        verb: &str,
        resource: &str,
    ) -> Result<WhoCanResult> {
        self.get(&format!(
            "/apis/namespaces/{namespace}/access?verb={verb}&resource={resource}"
        ))
        .await
    }

    pub async fn overwrite_policy(&self, policy: &PolicyFile) -> Result<()> {
        let response = self
            .request(reqwest::Method::PUT, "/apis/policy/roles")
            .json(policy)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    // Nodes

    pub async fn list_nodes(&self) -> Result<Vec<NodeStatus>> {
        self.get("/apis/nodes").await
    }

    pub async fn set_node_schedulable(&self, node: &str, schedulable: bool) -> Result<NodeStatus> {
        #[derive(Serialize)]
        struct Body {
            schedulable: bool,
        }
        self.post(&format!("/apis/nodes/{node}/schedulable"), &Body { schedulable })
            .await
    }

    pub async fn evacuate_node(&self, node: &str, dry_run: bool) -> Result<EvacuationReport> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body {
            dry_run: bool,
        }
        self.post(&format!("/apis/nodes/{node}/evacuate"), &Body { dry_run })
            .await
    }

    pub async fn list_node_pods(&self, node: &str) -> Result<Vec<PodInfo>> {
        self.get(&format!("/apis/nodes/{node}/pods")).await
    }

    // Pruning

    pub async fn prune(&self, kind: PruneKind, request: &PruneRequest) -> Result<PruneReport> {
        self.post(&format!("/apis/prune/{}", kind.as_str()), request)
            .await
    }

    // Builds

    pub async fn build_chain(&self, tag: &str) -> Result<BuildChain> {
        self.get(&format!("/apis/builds/chain?tag={tag}")).await
    }

    // Infrastructure

    pub async fn create_deployment(&self, manifest: &DeploymentConfig) -> Result<()> {
        self.post_no_content("/apis/deployments", manifest).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneKind {
    Builds,
    Deployments,
    Images,
}

impl PruneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PruneKind::Builds => "builds",
            PruneKind::Deployments => "deployments",
            PruneKind::Images => "images",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PruneRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_younger_than_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_complete: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_failed: Option<u32>,
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PruneReport {
    pub dry_run: bool,
    #[serde(default)]
    pub pruned: Vec<PrunedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrunedItem {
    pub name: String,
    pub namespace: String,
}

/// Build dependency graph for an image tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildChain {
    pub root: String,
    #[serde(default)]
    pub edges: Vec<ChainEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainEdge {
    pub from: String,
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;
    use crate::policy::SubjectKind;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::resolve(&ConfigOverrides {
            server: Some(server.uri()),
            token: Some("sekret".to_string()),
            kubeconfig: Some(dir.path().join("absent")),
            ..ConfigOverrides::default()
        })
        .unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_normalize_url_strips_trailing_slashes() {
        assert_eq!(normalize_url("https://x:8443/"), "https://x:8443");
        assert_eq!(normalize_url("https://x:8443"), "https://x:8443");
    }

    #[tokio::test]
    async fn test_create_project_posts_request() {
        let server = MockServer::start().await;
        let request = ProjectRequest {
            name: "web".to_string(),
            ..ProjectRequest::default()
        };
        Mock::given(method("POST"))
            .and(path("/apis/projects"))
            .and(body_json(&request))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "name": "web"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let project = client_for(&server).await.create_project(&request).await.unwrap();
        assert_eq!(project.name, "web");
    }

    #[tokio::test]
    async fn test_api_error_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apis/nodes"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "message": "forbidden: not a cluster admin"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.list_nodes().await.unwrap_err();
        match err {
            CoreError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("forbidden"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_remove_role_binding_encodes_subject() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/apis/namespaces/web/rolebindings/admin"))
            .and(query_param("subjectKind", "User"))
            .and(query_param("subjectName", "alice"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .await
            .remove_role_binding(
                "web",
                &RoleBindingChange {
                    role: "admin".to_string(),
                    subject_kind: SubjectKind::User,
                    subject_name: "alice".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_prune_hits_kind_specific_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/prune/builds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "dryRun": true,
                "pruned": [{"name": "build-7", "namespace": "web"}]
            })))
            .mount(&server)
            .await;

        let report = client_for(&server)
            .await
            .prune(PruneKind::Builds, &PruneRequest::default())
            .await
            .unwrap();
        assert!(report.dry_run);
        assert_eq!(report.pruned[0].name, "build-7");
    }
}
