//! Static catalog of every CRD the operator relies on
//!
//! Definitions come in three groups with different ownership:
//!
//! - **Primary**: owned by this operator
//! - **Locker dependency**: owned by helm-locker, installed alongside
//! - **Controller dependency**: owned by helm-controller, which k3s and RKE2
//!   already ship; only managed when the cluster does not own them

use hpo_core::{HelmChart, HelmChartConfig, HelmRelease, ProjectHelmChart};

use super::definition::CrdDefinition;

/// Ownership group of a CRD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrdGroupKind {
    Primary,
    LockerDependency,
    ControllerDependency,
}

impl CrdGroupKind {
    /// All groups, in merge order
    pub const ALL: [CrdGroupKind; 3] = [
        CrdGroupKind::Primary,
        CrdGroupKind::LockerDependency,
        CrdGroupKind::ControllerDependency,
    ];

    /// Whether this group is owned by another component
    pub fn is_dependency(&self) -> bool {
        !matches!(self, Self::Primary)
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Primary => "owned by this operator",
            Self::LockerDependency => "owned by helm-locker",
            Self::ControllerDependency => "owned by helm-controller",
        }
    }
}

impl std::fmt::Display for CrdGroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::LockerDependency => write!(f, "locker-dependency"),
            Self::ControllerDependency => write!(f, "controller-dependency"),
        }
    }
}

/// The three groups of CRD definitions
#[derive(Debug, Clone, Default)]
pub struct CrdCatalog {
    pub primary: Vec<CrdDefinition>,
    pub locker_deps: Vec<CrdDefinition>,
    pub controller_deps: Vec<CrdDefinition>,
}

impl CrdCatalog {
    /// The catalog shipped with the operator
    pub fn list() -> Self {
        Self {
            primary: vec![project_helm_chart()],
            locker_deps: vec![helm_release()],
            controller_deps: vec![helm_chart(), helm_chart_config()],
        }
    }

    /// Definitions in one group
    pub fn group(&self, kind: CrdGroupKind) -> &[CrdDefinition] {
        match kind {
            CrdGroupKind::Primary => &self.primary,
            CrdGroupKind::LockerDependency => &self.locker_deps,
            CrdGroupKind::ControllerDependency => &self.controller_deps,
        }
    }

    /// Locker and controller dependencies, in that order
    pub fn dependencies(&self) -> Vec<CrdDefinition> {
        self.locker_deps
            .iter()
            .chain(self.controller_deps.iter())
            .cloned()
            .collect()
    }

    /// Every definition with its group, in merge order
    pub fn iter(&self) -> impl Iterator<Item = (CrdGroupKind, &CrdDefinition)> {
        CrdGroupKind::ALL
            .into_iter()
            .flat_map(move |kind| self.group(kind).iter().map(move |def| (kind, def)))
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.locker_deps.len() + self.controller_deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn project_helm_chart() -> CrdDefinition {
    CrdDefinition::namespaced::<ProjectHelmChart>()
        .with_column("Status", ".status.status")
        .with_column("System Namespace", ".status.systemNamespace")
        .with_column("Release Namespace", ".status.releaseNamespace")
        .with_column("Release Name", ".status.releaseName")
        .with_column("Target Namespaces", ".status.targetNamespaces")
}

fn helm_release() -> CrdDefinition {
    CrdDefinition::namespaced::<HelmRelease>()
        .with_column("Release Name", ".spec.release.name")
        .with_column("Release Namespace", ".spec.release.namespace")
        .with_typed_column("Version", ".status.version", "integer")
        .with_column("State", ".status.state")
}

fn helm_chart() -> CrdDefinition {
    CrdDefinition::namespaced::<HelmChart>()
        .with_column("Job", ".status.jobName")
        .with_column("Chart", ".spec.chart")
        .with_column("TargetNamespace", ".spec.targetNamespace")
        .with_column("Version", ".spec.version")
        .with_column("Repo", ".spec.repo")
        .with_column("HelmVersion", ".spec.helmVersion")
        .with_typed_column("Bootstrap", ".spec.bootstrap", "boolean")
}

fn helm_chart_config() -> CrdDefinition {
    CrdDefinition::namespaced::<HelmChartConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_groups() {
        let catalog = CrdCatalog::list();
        assert_eq!(catalog.primary.len(), 1);
        assert_eq!(catalog.locker_deps.len(), 1);
        assert_eq!(catalog.controller_deps.len(), 2);
        assert_eq!(catalog.len(), 4);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_catalog_is_deterministic() {
        assert_eq!(
            CrdCatalog::list().iter().map(|(_, d)| d.clone()).collect::<Vec<_>>(),
            CrdCatalog::list().iter().map(|(_, d)| d.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_identities_are_unique() {
        let catalog = CrdCatalog::list();
        let identities: HashSet<_> = catalog.iter().map(|(_, d)| d.identity()).collect();
        assert_eq!(identities.len(), catalog.len());
    }

    #[test]
    fn test_primary_columns() {
        let catalog = CrdCatalog::list();
        assert_eq!(
            catalog.primary[0].column_names(),
            vec![
                "Status",
                "System Namespace",
                "Release Namespace",
                "Release Name",
                "Target Namespaces"
            ]
        );
    }

    #[test]
    fn test_dependencies_order() {
        let names: Vec<String> = CrdCatalog::list()
            .dependencies()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "helmreleases.helm.cattle.io",
                "helmcharts.helm.cattle.io",
                "helmchartconfigs.helm.cattle.io"
            ]
        );
    }

    #[test]
    fn test_iter_tags_groups() {
        let catalog = CrdCatalog::list();
        let groups: Vec<CrdGroupKind> = catalog.iter().map(|(g, _)| g).collect();
        assert_eq!(
            groups,
            vec![
                CrdGroupKind::Primary,
                CrdGroupKind::LockerDependency,
                CrdGroupKind::ControllerDependency,
                CrdGroupKind::ControllerDependency
            ]
        );
        assert!(!CrdGroupKind::Primary.is_dependency());
        assert!(CrdGroupKind::ControllerDependency.is_dependency());
    }
}
