//! ProjectHelmChart custom resource
//!
//! A ProjectHelmChart asks the operator to deploy one Helm release per
//! project, targeting the namespaces that belong to that project.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Specification for a ProjectHelmChart
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "helm.cattle.io",
    version = "v1alpha1",
    kind = "ProjectHelmChart",
    plural = "projecthelmcharts",
    status = "ProjectHelmChartStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHelmChartSpec {
    /// Identifies which operator (and embedded chart) handles this resource
    pub helm_api_version: String,

    /// Values merged into the embedded chart's defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "super::preserve_unknown_fields")]
    pub values: Option<BTreeMap<String, serde_json::Value>>,
}

/// Observed state of a ProjectHelmChart
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHelmChartStatus {
    /// Values published by the deployed chart for dashboards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "super::preserve_unknown_fields")]
    pub dashboard_values: Option<BTreeMap<String, serde_json::Value>>,

    /// Current status (e.g. Deployed, WaitingForDashboardValues)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// Namespace the operator watches for this project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_namespace: Option<String>,

    /// Namespace the Helm release is installed into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,

    /// Namespaces selected by the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_namespaces: Option<Vec<String>>,
}
