//! CRD handling for the helm project operator
//!
//! This module decides which CRDs must be created before the operator can
//! run, and which belong to someone else:
//!
//! - **Definitions** (`definition`): a rendered CRD plus its identity
//! - **Catalog** (`catalog`): the primary, helm-locker and helm-controller groups
//! - **Runtime** (`runtime`): detects k3s/RKE2, which own the helm-controller CRDs
//! - **Filter** (`filter`): drops CRDs the cluster already has
//! - **Planner** (`planner`): merges the groups and batch-creates the result
//! - **Export** (`export`): writes CRDs to per-resource files or streams
//! - **Client** (`client`): cluster seams and their kube-backed implementations
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     CRD Install Pipeline                      │
//! ├───────────────────────────────────────────────────────────────┤
//! │                                                               │
//! │  Catalog ──► Filter ──► Merge ──► Ownership ──► Batch create  │
//! │     │       (skipped                 gate                     │
//! │     │        on force)            (k3s/rke2)                  │
//! │     │                                                         │
//! │     └──────► Export (always full, unfiltered)                 │
//! │                                                               │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hpo_kube::crd::{CrdCatalog, KubeCrdClient, KubeRuntimeInspector, Planner};
//! use hpo_kube::PlannerConfig;
//!
//! let client = kube::Client::try_default().await?;
//! let planner = Planner::new(
//!     KubeCrdClient::new(client.clone()),
//!     KubeRuntimeInspector::new(client),
//!     PlannerConfig::default(),
//! );
//! let report = planner.install(&CrdCatalog::list(), false).await?;
//! ```

mod catalog;
mod client;
mod definition;
pub mod export;
mod filter;
pub mod mock;
mod planner;
mod runtime;

pub use catalog::{CrdCatalog, CrdGroupKind};
pub use client::{
    CrdApplyResult, CrdClient, CrdRecord, KubeCrdClient, KubeRuntimeInspector, RuntimeInspector,
};
pub use definition::CrdDefinition;
pub use export::{CatalogWriteReport, WriteReport, print_catalog, write_catalog, write_files};
pub use filter::{CrdState, filter_missing, query_state};
pub use mock::{CrdOperationCounts, MockCrdClient, MockRuntimeInspector};
pub use planner::{InstallReport, InstallationPlan, Planner, SkipReason, SkippedCrd};
pub use runtime::{NodeFacts, RuntimeIdentity, should_manage_controller_crds};
