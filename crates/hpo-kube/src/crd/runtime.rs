//! Kubernetes distribution detection
//!
//! Some distributions install CRDs of their own. k3s and RKE2 embed
//! helm-controller, so the HelmChart and HelmChartConfig CRDs belong to the
//! cluster there and must not be overwritten by the operator.
//!
//! Detection is best effort: node kubelet versions carry a distribution
//! suffix (`v1.31.2+k3s1`, `v1.31.2+rke2r1`, `v1.31.2-eks-7f9249a`), and
//! managed offerings label their nodes. Anything inconclusive is
//! [`RuntimeIdentity::Unknown`].

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Node;
use tracing::{debug, error};

use super::client::RuntimeInspector;
use crate::config::PlannerConfig;

/// Node annotation set by RKE1 on every node it provisions
const RKE_NODE_ANNOTATION: &str = "rke.cattle.io/external-ip";

/// A detected Kubernetes distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuntimeIdentity {
    K3s,
    Rke2,
    Rke,
    Eks,
    Gke,
    Aks,
    #[default]
    Unknown,
}

impl RuntimeIdentity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::K3s => "k3s",
            Self::Rke2 => "rke2",
            Self::Rke => "rke",
            Self::Eks => "eks",
            Self::Gke => "gke",
            Self::Aks => "aks",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the distribution ships (and therefore owns) the helm-controller CRDs
    pub fn owns_controller_crds(&self) -> bool {
        matches!(self, Self::K3s | Self::Rke2)
    }

    /// Identify a distribution from a kubelet or API server version string
    pub fn from_version(version: &str) -> Option<Self> {
        let version = version.to_lowercase();
        if version.contains("+k3s") {
            Some(Self::K3s)
        } else if version.contains("+rke2") {
            Some(Self::Rke2)
        } else if version.contains("-eks-") {
            Some(Self::Eks)
        } else if version.contains("-gke.") {
            Some(Self::Gke)
        } else {
            None
        }
    }

    /// Identify a distribution from node labels and annotations
    pub fn from_metadata(
        labels: &BTreeMap<String, String>,
        annotations: &BTreeMap<String, String>,
    ) -> Option<Self> {
        match labels.get("node.kubernetes.io/instance-type").map(String::as_str) {
            Some("k3s") => return Some(Self::K3s),
            Some("rke2") => return Some(Self::Rke2),
            _ => {}
        }

        if labels.contains_key("eks.amazonaws.com/nodegroup") {
            Some(Self::Eks)
        } else if labels.contains_key("cloud.google.com/gke-nodepool") {
            Some(Self::Gke)
        } else if labels.contains_key("kubernetes.azure.com/cluster") {
            Some(Self::Aks)
        } else if annotations.contains_key(RKE_NODE_ANNOTATION) {
            Some(Self::Rke)
        } else {
            None
        }
    }

    /// Classify a cluster from its nodes; the first decisive node wins
    pub fn from_nodes(nodes: &[NodeFacts]) -> Self {
        nodes
            .iter()
            .find_map(NodeFacts::identify)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for RuntimeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a Node that identify its distribution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFacts {
    pub name: String,
    pub kubelet_version: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl NodeFacts {
    /// Version suffix first, then labels
    pub fn identify(&self) -> Option<RuntimeIdentity> {
        RuntimeIdentity::from_version(&self.kubelet_version)
            .or_else(|| RuntimeIdentity::from_metadata(&self.labels, &self.annotations))
    }
}

impl From<&Node> for NodeFacts {
    fn from(node: &Node) -> Self {
        Self {
            name: node.metadata.name.clone().unwrap_or_default(),
            kubelet_version: node
                .status
                .as_ref()
                .and_then(|s| s.node_info.as_ref())
                .map(|info| info.kubelet_version.clone())
                .unwrap_or_default(),
            labels: node.metadata.labels.clone().unwrap_or_default(),
            annotations: node.metadata.annotations.clone().unwrap_or_default(),
        }
    }
}

/// Decide whether this operator manages the helm-controller CRDs.
///
/// Fails open: if detection is disabled or the cluster cannot be
/// inspected, the CRDs are managed.
pub async fn should_manage_controller_crds<I>(config: &PlannerConfig, inspector: &I) -> bool
where
    I: RuntimeInspector + ?Sized,
{
    if !config.detect_runtime_ownership {
        debug!("k3s/rke2 detection is disabled; helm-controller CRDs will be managed");
        return true;
    }

    let runtime = match inspector.identify_runtime().await {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "could not identify the Kubernetes runtime");
            RuntimeIdentity::Unknown
        }
    };

    if runtime.owns_controller_crds() {
        debug!(
            runtime = %runtime,
            "cluster runs k3s or rke2; helm-controller CRDs will not be managed"
        );
        return false;
    }

    debug!(runtime = %runtime, "helm-controller CRDs will be managed");
    true
}
