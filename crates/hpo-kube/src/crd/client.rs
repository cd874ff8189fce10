//! Cluster seams used by the planner
//!
//! [`CrdClient`] fetches and applies CRDs, [`RuntimeInspector`] identifies
//! the distribution. The kube-backed implementations talk to a real API
//! server; `crd::mock` provides in-memory ones for tests.

use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{
    Client,
    api::{Api, DynamicObject, ListParams, Patch, PatchParams},
    discovery::ApiResource,
    runtime::wait::{await_condition, conditions},
};
use tracing::debug;

use super::definition::CrdDefinition;
use super::runtime::{NodeFacts, RuntimeIdentity};
use crate::error::{CrdError, Result};

/// Field manager for server-side apply
const CRD_FIELD_MANAGER: &str = "hpo-crd";

/// A CRD as stored in the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrdRecord {
    pub name: String,
    /// `status.storedVersions`, oldest first
    pub stored_versions: Vec<String>,
}

impl CrdRecord {
    fn from_dynamic(name: &str, obj: &DynamicObject) -> Self {
        let stored_versions = obj
            .data
            .get("status")
            .and_then(|s| s.get("storedVersions"))
            .and_then(|v| v.as_array())
            .map(|versions| {
                versions
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.to_string(),
            stored_versions,
        }
    }
}

/// Result of applying a CRD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrdApplyResult {
    /// CRD name
    pub name: String,
    /// Whether it was created (true) or updated (false)
    pub created: bool,
}

impl CrdApplyResult {
    /// Get a display message for this result
    pub fn message(&self) -> String {
        if self.created {
            format!("created CRD {}", self.name)
        } else {
            format!("updated CRD {}", self.name)
        }
    }
}

/// Access to CustomResourceDefinitions in a cluster
///
/// Implementations must be Send + Sync; calls block for one API round trip.
#[async_trait]
pub trait CrdClient: Send + Sync {
    /// Fetch a CRD by name; `Ok(None)` when it does not exist
    async fn get(&self, name: &str) -> Result<Option<CrdRecord>>;

    /// Create or update a CRD
    async fn apply(&self, definition: &CrdDefinition) -> Result<CrdApplyResult>;

    /// Wait until a CRD reports the `Established` condition
    async fn wait_established(&self, name: &str, timeout: Duration) -> Result<()>;
}

/// Identifies the Kubernetes distribution of a cluster
#[async_trait]
pub trait RuntimeInspector: Send + Sync {
    async fn identify_runtime(&self) -> Result<RuntimeIdentity>;
}

/// [`CrdClient`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeCrdClient {
    client: Client,
}

impl KubeCrdClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn dynamic_api(&self) -> Api<DynamicObject> {
        // CRDs are cluster-scoped
        Api::all_with(
            self.client.clone(),
            &ApiResource::erase::<CustomResourceDefinition>(&()),
        )
    }
}

#[async_trait]
impl CrdClient for KubeCrdClient {
    async fn get(&self, name: &str) -> Result<Option<CrdRecord>> {
        let found = self.dynamic_api().get_opt(name).await?;
        Ok(found.map(|obj| CrdRecord::from_dynamic(name, &obj)))
    }

    async fn apply(&self, definition: &CrdDefinition) -> Result<CrdApplyResult> {
        let name = definition.name();
        let api: Api<CustomResourceDefinition> = Api::all(self.client.clone());

        let exists = api.get_opt(name).await?.is_some();

        let params = PatchParams::apply(CRD_FIELD_MANAGER).force();
        api.patch(name, &params, &Patch::Apply(definition.crd()))
            .await?;

        Ok(CrdApplyResult {
            name: name.to_string(),
            created: !exists,
        })
    }

    async fn wait_established(&self, name: &str, timeout: Duration) -> Result<()> {
        let api: Api<CustomResourceDefinition> = Api::all(self.client.clone());
        let established = await_condition(api, name, conditions::is_crd_established());

        match tokio::time::timeout(timeout, established).await {
            Ok(outcome) => outcome.map(|_| ()).map_err(CrdError::from),
            Err(_) => Err(CrdError::Timeout(format!(
                "{name} was not established within {}s",
                timeout.as_secs_f32()
            ))),
        }
    }
}

/// [`RuntimeInspector`] backed by the Kubernetes API
///
/// Node metadata is the primary signal. The API server version is consulted
/// when the nodes are inconclusive or cannot be listed.
#[derive(Clone)]
pub struct KubeRuntimeInspector {
    client: Client,
}

impl KubeRuntimeInspector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn identify_from_nodes(&self) -> std::result::Result<RuntimeIdentity, kube::Error> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes.list(&ListParams::default()).await?;
        let facts: Vec<NodeFacts> = list.items.iter().map(NodeFacts::from).collect();
        debug!(nodes = facts.len(), "inspected cluster nodes");
        Ok(RuntimeIdentity::from_nodes(&facts))
    }
}

#[async_trait]
impl RuntimeInspector for KubeRuntimeInspector {
    async fn identify_runtime(&self) -> Result<RuntimeIdentity> {
        let node_error = match self.identify_from_nodes().await {
            Ok(RuntimeIdentity::Unknown) => None,
            Ok(runtime) => return Ok(runtime),
            Err(err) => {
                debug!(error = %err, "failed to list nodes, falling back to API server version");
                Some(err)
            }
        };

        match self.client.apiserver_version().await {
            Ok(info) => {
                debug!(git_version = %info.git_version, "checking API server version");
                Ok(RuntimeIdentity::from_version(&info.git_version).unwrap_or_default())
            }
            Err(version_err) => Err(CrdError::RuntimeDetection(match node_error {
                Some(node_err) => format!(
                    "failed to list nodes: {node_err}; failed to read API server version: {version_err}"
                ),
                None => format!("failed to read API server version: {version_err}"),
            })),
        }
    }
}
