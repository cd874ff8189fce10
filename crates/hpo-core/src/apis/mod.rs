//! API types, one module per owning component
//!
//! All resources live in the `helm.cattle.io` group:
//!
//! | Kind              | Version    | Owner                 |
//! |-------------------|------------|-----------------------|
//! | ProjectHelmChart  | v1alpha1   | helm project operator |
//! | HelmRelease       | v1alpha1   | helm-locker           |
//! | HelmChart         | v1         | helm-controller       |
//! | HelmChartConfig   | v1         | helm-controller       |

mod helm_chart;
mod helm_release;
mod project_helm_chart;

pub use helm_chart::{HelmChart, HelmChartConfig, HelmChartConfigSpec, HelmChartSpec, HelmChartStatus};
pub use helm_release::{HelmRelease, HelmReleaseSpec, HelmReleaseStatus, ReleaseKey};
pub use project_helm_chart::{ProjectHelmChart, ProjectHelmChartSpec, ProjectHelmChartStatus};

use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};

/// API group shared by every resource in this crate
pub const GROUP: &str = "helm.cattle.io";

/// Schema for free-form chart values: an object the API server must not prune
pub(crate) fn preserve_unknown_fields(_: &mut SchemaGenerator) -> Schema {
    let mut schema = SchemaObject {
        instance_type: Some(InstanceType::Object.into()),
        ..Default::default()
    };
    schema.extensions.insert(
        "x-kubernetes-preserve-unknown-fields".to_string(),
        serde_json::Value::Bool(true),
    );
    Schema::Object(schema)
}
