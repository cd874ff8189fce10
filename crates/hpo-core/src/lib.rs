//! Hpo Core - custom resource types for the helm project operator
//!
//! This crate provides:
//! - **ProjectHelmChart**: the resource owned by the operator itself
//! - **HelmRelease**: the resource owned by helm-locker, a dependency
//! - **HelmChart / HelmChartConfig**: the resources owned by helm-controller,
//!   a dependency that k3s and RKE2 ship as part of the distribution
//!
//! Every type derives `kube::CustomResource`, so its CRD (including the
//! OpenAPI schema) can be produced with `CustomResourceExt::crd()`.

pub mod apis;

pub use apis::{
    HelmChart, HelmChartConfig, HelmChartConfigSpec, HelmChartSpec, HelmChartStatus,
    HelmRelease, HelmReleaseSpec, HelmReleaseStatus, ProjectHelmChart, ProjectHelmChartSpec,
    ProjectHelmChartStatus, ReleaseKey,
};
