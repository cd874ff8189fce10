//! HelmRelease custom resource (owned by helm-locker)
//!
//! A HelmRelease locks the resources of an existing Helm release in place,
//! reverting out-of-band changes.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "helm.cattle.io",
    version = "v1alpha1",
    kind = "HelmRelease",
    plural = "helmreleases",
    status = "HelmReleaseStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseSpec {
    /// The Helm release to lock
    pub release: ReleaseKey,
}

/// Name and namespace of a Helm release
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ReleaseKey {
    pub name: String,
    pub namespace: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseStatus {
    /// Lock state (e.g. Secured, Untracked, Errored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Revision of the locked release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
