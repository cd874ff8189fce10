//! In-memory cluster seams for testing
//!
//! These stand in for a Kubernetes cluster in unit tests, and record how
//! often each operation ran so tests can assert on it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::client::{CrdApplyResult, CrdClient, CrdRecord, RuntimeInspector};
use super::definition::CrdDefinition;
use super::runtime::RuntimeIdentity;
use crate::error::{CrdError, Result};

/// What the mock cluster holds under a CRD name
#[derive(Debug, Clone)]
enum StoredCrd {
    Present(Vec<String>),
    QueryError(String),
}

/// In-memory CRD client
#[derive(Clone, Default)]
pub struct MockCrdClient {
    crds: Arc<RwLock<HashMap<String, StoredCrd>>>,
    apply_errors: Arc<RwLock<HashMap<String, String>>>,
    never_established: Arc<RwLock<HashSet<String>>>,
    applied: Arc<RwLock<Vec<String>>>,
    operations: Arc<RwLock<CrdOperationCounts>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrdOperationCounts {
    pub gets: usize,
    pub applies: usize,
    pub waits: usize,
}

fn server_error(message: &str) -> CrdError {
    CrdError::Api(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: "InternalError".to_string(),
        code: 500,
    }))
}

impl MockCrdClient {
    /// Create an empty cluster
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a CRD as present with the given stored versions
    pub fn with_present(self, name: &str, stored_versions: &[&str]) -> Self {
        self.crds.write().unwrap().insert(
            name.to_string(),
            StoredCrd::Present(stored_versions.iter().map(|v| v.to_string()).collect()),
        );
        self
    }

    /// Make every query for a CRD fail with a server error
    pub fn with_query_error(self, name: &str, message: &str) -> Self {
        self.crds
            .write()
            .unwrap()
            .insert(name.to_string(), StoredCrd::QueryError(message.to_string()));
        self
    }

    /// Make applying a CRD fail
    pub fn with_apply_error(self, name: &str, message: &str) -> Self {
        self.apply_errors
            .write()
            .unwrap()
            .insert(name.to_string(), message.to_string());
        self
    }

    /// Make waiting for a CRD time out
    pub fn with_never_established(self, name: &str) -> Self {
        self.never_established
            .write()
            .unwrap()
            .insert(name.to_string());
        self
    }

    /// Names of applied CRDs, in call order
    pub fn applied(&self) -> Vec<String> {
        self.applied.read().unwrap().clone()
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> CrdOperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// Check whether a CRD is present
    pub fn contains(&self, name: &str) -> bool {
        matches!(
            self.crds.read().unwrap().get(name),
            Some(StoredCrd::Present(_))
        )
    }
}

#[async_trait]
impl CrdClient for MockCrdClient {
    async fn get(&self, name: &str) -> Result<Option<CrdRecord>> {
        self.operations.write().unwrap().gets += 1;

        match self.crds.read().unwrap().get(name) {
            Some(StoredCrd::Present(versions)) => Ok(Some(CrdRecord {
                name: name.to_string(),
                stored_versions: versions.clone(),
            })),
            Some(StoredCrd::QueryError(message)) => Err(server_error(message)),
            None => Ok(None),
        }
    }

    async fn apply(&self, definition: &CrdDefinition) -> Result<CrdApplyResult> {
        self.operations.write().unwrap().applies += 1;

        let name = definition.name().to_string();
        if let Some(message) = self.apply_errors.read().unwrap().get(&name) {
            return Err(server_error(message));
        }

        let existed = self
            .crds
            .write()
            .unwrap()
            .insert(
                name.clone(),
                StoredCrd::Present(vec![definition.version().to_string()]),
            )
            .is_some();
        self.applied.write().unwrap().push(name.clone());

        Ok(CrdApplyResult {
            name,
            created: !existed,
        })
    }

    async fn wait_established(&self, name: &str, timeout: Duration) -> Result<()> {
        self.operations.write().unwrap().waits += 1;

        if self.never_established.read().unwrap().contains(name) {
            return Err(CrdError::Timeout(format!(
                "CRD {} not established after {:?}",
                name, timeout
            )));
        }
        Ok(())
    }
}

/// Runtime inspector returning a fixed answer
#[derive(Clone)]
pub struct MockRuntimeInspector {
    outcome: std::result::Result<RuntimeIdentity, String>,
    calls: Arc<AtomicUsize>,
}

impl MockRuntimeInspector {
    /// Always report the given distribution
    pub fn detecting(runtime: RuntimeIdentity) -> Self {
        Self {
            outcome: Ok(runtime),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fail inspection
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of inspections performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuntimeInspector for MockRuntimeInspector {
    async fn identify_runtime(&self) -> Result<RuntimeIdentity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(CrdError::RuntimeDetection)
    }
}
