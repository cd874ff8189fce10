//! Hpo Kube - CRD management for the helm project operator
//!
//! This crate provides:
//! - **Catalog**: every CRD the operator relies on, grouped by owner
//! - **Ownership detection**: leaves distribution-owned CRDs (k3s, RKE2) alone
//! - **Install planning**: creates only what is missing, or everything on force update
//! - **Export**: writes CRDs to chart directories or output streams

pub mod config;
pub mod crd;
pub mod error;

pub use config::PlannerConfig;
pub use crd::{
    CrdCatalog, CrdDefinition, CrdGroupKind, InstallReport, InstallationPlan, KubeCrdClient,
    KubeRuntimeInspector, Planner, RuntimeIdentity, SkipReason,
};
pub use error::{CrdError, Result};
