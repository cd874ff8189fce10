//! CRD definitions
//!
//! A [`CrdDefinition`] is a fully rendered `apiextensions.k8s.io/v1`
//! CustomResourceDefinition together with the identity of the resource type
//! it registers. Definitions are immutable once built; customisation happens
//! through consuming builder methods.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceColumnDefinition, CustomResourceDefinition,
};
use kube::{CustomResourceExt, Resource};

use crate::error::Result;

/// Printer column type used when none is given
const DEFAULT_COLUMN_TYPE: &str = "string";

/// A custom resource type this operator knows how to install
#[derive(Debug, Clone, PartialEq)]
pub struct CrdDefinition {
    group: String,
    version: String,
    kind: String,
    plural: String,
    /// Canonical cluster-facing name: `<plural>.<group>`
    name: String,
    crd: CustomResourceDefinition,
}

impl CrdDefinition {
    /// Build the definition of a namespaced resource from its Rust type.
    ///
    /// The OpenAPI schema is derived from `K`. Panics if `K` is not
    /// namespaced: the catalog is static, so that is a programming error.
    pub fn namespaced<K>() -> Self
    where
        K: CustomResourceExt + Resource<DynamicType = ()>,
    {
        let crd = K::crd();
        assert_eq!(
            crd.spec.scope,
            "Namespaced",
            "{} must be declared as a namespaced resource",
            K::crd_name()
        );

        let group = K::group(&()).into_owned();
        let plural = K::plural(&()).into_owned();
        Self {
            name: format!("{}.{}", plural, group),
            version: K::version(&()).into_owned(),
            kind: K::kind(&()).into_owned(),
            group,
            plural,
            crd,
        }
    }

    /// Add a `string` printer column to every served version
    pub fn with_column(self, name: &str, json_path: &str) -> Self {
        self.with_typed_column(name, json_path, DEFAULT_COLUMN_TYPE)
    }

    /// Add a printer column of the given OpenAPI type to every served version
    pub fn with_typed_column(mut self, name: &str, json_path: &str, type_: &str) -> Self {
        for version in &mut self.crd.spec.versions {
            version
                .additional_printer_columns
                .get_or_insert_with(Vec::new)
                .push(CustomResourceColumnDefinition {
                    name: name.to_string(),
                    json_path: json_path.to_string(),
                    type_: type_.to_string(),
                    ..Default::default()
                });
        }
        self
    }

    /// Canonical cluster-facing name (e.g. `helmcharts.helm.cattle.io`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output grouping key: the first dot-delimited segment of the name
    pub fn group_key(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Identity of the resource type: group and kind
    pub fn identity(&self) -> (&str, &str) {
        (&self.group, &self.kind)
    }

    /// The rendered CustomResourceDefinition
    pub fn crd(&self) -> &CustomResourceDefinition {
        &self.crd
    }

    /// Names of the printer columns declared on the first version
    pub fn column_names(&self) -> Vec<&str> {
        self.crd
            .spec
            .versions
            .first()
            .and_then(|v| v.additional_printer_columns.as_ref())
            .map(|cols| cols.iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Serialize the CRD to a single YAML document
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.crd)?)
    }
}

impl std::fmt::Display for CrdDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}/{}", self.kind, self.group, self.version)
    }
}
