//! HelmChart and HelmChartConfig custom resources (owned by helm-controller)
//!
//! k3s and RKE2 embed helm-controller and install these CRDs themselves, so
//! on those distributions they belong to the cluster, not to the operator.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A chart installed into the cluster by a helm-controller job
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "helm.cattle.io",
    version = "v1",
    kind = "HelmChart",
    plural = "helmcharts",
    status = "HelmChartStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,

    #[serde(default)]
    pub create_namespace: bool,

    /// Chart name, URL or `repo/name` reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_ca: Option<String>,

    /// Individual `--set` overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<BTreeMap<String, String>>,

    /// Raw values.yaml content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm_version: Option<String>,

    /// Install before the cluster has a CNI
    #[serde(default)]
    pub bootstrap: bool,

    /// Base64 encoded chart archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_image: Option<String>,

    /// Helm operation timeout (e.g. `300s`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// `reinstall` or `abort`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartStatus {
    /// Job running the last helm operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
}

/// Overrides for a HelmChart of the same name
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "helm.cattle.io",
    version = "v1",
    kind = "HelmChartConfig",
    plural = "helmchartconfigs",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<String>,
}
