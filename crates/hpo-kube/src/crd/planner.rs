//! Installation planning and batch creation
//!
//! The planner turns the catalog into the list of CRDs to submit:
//!
//! ```text
//!   catalog ──► existence filter ──► merge ──► ownership gate ──► batch create
//!               (per group, unless              (controller
//!                force_update)                   dependencies)
//! ```
//!
//! Creation is not transactional: CRDs created before a failure in the
//! same batch stay installed.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, info};

use super::catalog::{CrdCatalog, CrdGroupKind};
use super::client::{CrdApplyResult, CrdClient, RuntimeInspector};
use super::definition::CrdDefinition;
use super::filter::filter_missing;
use super::runtime::should_manage_controller_crds;
use crate::config::PlannerConfig;
use crate::error::{CrdError, Result};

/// Why a catalog CRD is not in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The cluster already has it
    AlreadyPresent,
    /// The Kubernetes distribution owns it
    OwnedByRuntime,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyPresent => write!(f, "already present"),
            Self::OwnedByRuntime => write!(f, "owned by the Kubernetes distribution"),
        }
    }
}

/// A catalog CRD left out of the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCrd {
    pub name: String,
    pub group: CrdGroupKind,
    pub reason: SkipReason,
}

/// The ordered list of CRDs to submit for creation
#[derive(Debug, Clone, Default)]
pub struct InstallationPlan {
    definitions: Vec<CrdDefinition>,
    skipped: Vec<SkippedCrd>,
}

impl InstallationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group of definitions, rejecting duplicate identities
    pub fn extend(&mut self, definitions: Vec<CrdDefinition>) -> Result<()> {
        let mut seen: HashSet<(String, String)> = self
            .definitions
            .iter()
            .map(|d| (d.group().to_string(), d.kind().to_string()))
            .collect();

        for def in &definitions {
            if !seen.insert((def.group().to_string(), def.kind().to_string())) {
                return Err(CrdError::DuplicateDefinition {
                    name: def.name().to_string(),
                });
            }
        }

        self.definitions.extend(definitions);
        Ok(())
    }

    /// Record a CRD that will not be submitted
    pub fn skip(&mut self, name: &str, group: CrdGroupKind, reason: SkipReason) {
        self.skipped.push(SkippedCrd {
            name: name.to_string(),
            group,
            reason,
        });
    }

    pub fn definitions(&self) -> &[CrdDefinition] {
        &self.definitions
    }

    pub fn skipped(&self) -> &[SkippedCrd] {
        &self.skipped
    }

    /// Names of the planned CRDs, in submission order
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name() == name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn into_definitions(self) -> Vec<CrdDefinition> {
        self.definitions
    }
}

/// Outcome of a successful install
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub applied: Vec<CrdApplyResult>,
    pub skipped: Vec<SkippedCrd>,
}

impl InstallReport {
    /// Number of CRDs created (as opposed to updated)
    pub fn created_count(&self) -> usize {
        self.applied.iter().filter(|r| r.created).count()
    }
}

/// Plans and installs the catalog against one cluster
pub struct Planner<C, I> {
    client: C,
    inspector: I,
    config: PlannerConfig,
}

impl<C, I> Planner<C, I>
where
    C: CrdClient,
    I: RuntimeInspector,
{
    pub fn new(client: C, inspector: I, config: PlannerConfig) -> Self {
        Self {
            client,
            inspector,
            config,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Compute the CRDs to install.
    ///
    /// With `force_update`, the cluster is not consulted for existence and
    /// every managed CRD is planned.
    pub async fn plan(&self, catalog: &CrdCatalog, force_update: bool) -> Result<InstallationPlan> {
        let mut plan = InstallationPlan::new();

        let mut groups = Vec::with_capacity(CrdGroupKind::ALL.len());
        for kind in CrdGroupKind::ALL {
            let expected = catalog.group(kind).to_vec();
            let missing = if force_update {
                expected
            } else {
                self.prune(&mut plan, kind, expected).await?
            };
            groups.push((kind, missing));
        }

        if force_update {
            debug!("force update is enabled; all CRDs will be installed");
        }

        let manage_controller = should_manage_controller_crds(&self.config, &self.inspector).await;

        for (kind, definitions) in groups {
            if kind == CrdGroupKind::ControllerDependency && !manage_controller {
                for def in &definitions {
                    plan.skip(def.name(), kind, SkipReason::OwnedByRuntime);
                }
                continue;
            }
            plan.extend(definitions)?;
        }

        Ok(plan)
    }

    /// Run the existence filter on one group, recording what it removed
    async fn prune(
        &self,
        plan: &mut InstallationPlan,
        kind: CrdGroupKind,
        expected: Vec<CrdDefinition>,
    ) -> Result<Vec<CrdDefinition>> {
        let names: Vec<String> = expected.iter().map(|d| d.name().to_string()).collect();
        let missing = filter_missing(&self.client, expected).await?;

        for name in names {
            if !missing.iter().any(|d| d.name() == name) {
                plan.skip(&name, kind, SkipReason::AlreadyPresent);
            }
        }
        Ok(missing)
    }

    /// Plan, then create every planned CRD
    pub async fn install(&self, catalog: &CrdCatalog, force_update: bool) -> Result<InstallReport> {
        let plan = self.plan(catalog, force_update).await?;
        let applied = self.create_batch(plan.definitions()).await?;

        Ok(InstallReport {
            applied,
            skipped: plan.skipped().to_vec(),
        })
    }

    /// Apply all definitions concurrently, then wait for each to be established.
    ///
    /// Every failure is collected into one [`CrdError::BatchCreate`].
    pub async fn create_batch(&self, definitions: &[CrdDefinition]) -> Result<Vec<CrdApplyResult>> {
        if definitions.is_empty() {
            debug!("no CRDs to create");
            return Ok(Vec::new());
        }

        info!(count = definitions.len(), "creating CRDs");

        let outcomes = join_all(
            definitions
                .iter()
                .map(|def| async move { (def.name(), self.client.apply(def).await) }),
        )
        .await;

        let mut failures = Vec::new();
        let mut applied = Vec::with_capacity(definitions.len());
        for (name, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    debug!(crd = %name, "{}", result.message());
                    applied.push(result);
                }
                Err(e) => failures.push((name.to_string(), e.to_string())),
            }
        }

        let timeout = self.config.establish_timeout;
        let waits = join_all(applied.iter().map(|result| async move {
            (
                result.name.as_str(),
                self.client.wait_established(&result.name, timeout).await,
            )
        }))
        .await;

        for (name, outcome) in waits {
            if let Err(e) = outcome {
                failures.push((name.to_string(), e.to_string()));
            }
        }

        if !failures.is_empty() {
            return Err(CrdError::BatchCreate { failures });
        }

        info!(count = applied.len(), "CRDs established");
        Ok(applied)
    }
}
