//! Existence filter
//!
//! Removes from a list of expected CRDs every CRD the cluster already has.
//! A CRD is only considered present when the cluster returns it with at
//! least one stored version; any query failure other than "not found"
//! aborts the whole filter, so a partially checked list is never installed.

use tracing::debug;

use super::client::CrdClient;
use super::definition::CrdDefinition;
use crate::error::{CrdError, Result};

/// What the cluster says about one CRD
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrdState {
    /// Installed, stored at `stored_version`
    Present { stored_version: String },
    /// Not installed
    Absent,
    /// The cluster could not answer
    Indeterminate { reason: String },
}

impl CrdState {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

/// Ask the cluster about one CRD
pub async fn query_state<C>(client: &C, name: &str) -> CrdState
where
    C: CrdClient + ?Sized,
{
    match client.get(name).await {
        Ok(Some(record)) => match record.stored_versions.first() {
            Some(version) => CrdState::Present {
                stored_version: version.clone(),
            },
            None => CrdState::Indeterminate {
                reason: "CRD exists but reports no stored versions".to_string(),
            },
        },
        Ok(None) => CrdState::Absent,
        Err(e) if e.is_not_found() => CrdState::Absent,
        Err(e) => CrdState::Indeterminate {
            reason: e.to_string(),
        },
    }
}

/// Return the definitions from `expected` that are missing from the cluster.
///
/// Definitions are checked from last to first; survivors keep their
/// relative order. Fails with [`CrdError::CrdQuery`] on the first
/// indeterminate answer, dropping the whole list.
pub async fn filter_missing<C>(client: &C, expected: Vec<CrdDefinition>) -> Result<Vec<CrdDefinition>>
where
    C: CrdClient + ?Sized,
{
    let mut missing = expected;

    for i in (0..missing.len()).rev() {
        let name = missing[i].name().to_string();

        match query_state(client, &name).await {
            CrdState::Present { stored_version } => {
                debug!(
                    crd = %name,
                    stored = %stored_version,
                    expected = %missing[i].version(),
                    "found CRD on the cluster; installing it will be skipped"
                );
                missing.remove(i);
            }
            CrdState::Absent => {
                debug!(crd = %name, "did not find CRD on the cluster; it will be installed");
            }
            CrdState::Indeterminate { reason } => {
                return Err(CrdError::CrdQuery { name, reason });
            }
        }
    }

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::catalog::CrdCatalog;
    use crate::crd::mock::MockCrdClient;

    fn names(defs: &[CrdDefinition]) -> Vec<&str> {
        defs.iter().map(|d| d.name()).collect()
    }

    #[tokio::test]
    async fn test_present_crd_is_removed() {
        let client = MockCrdClient::new().with_present("helmcharts.helm.cattle.io", &["v1"]);
        let expected = CrdCatalog::list().controller_deps;

        let missing = filter_missing(&client, expected).await.unwrap();
        assert_eq!(names(&missing), vec!["helmchartconfigs.helm.cattle.io"]);
    }

    #[tokio::test]
    async fn test_absent_crds_are_kept_in_order() {
        let client = MockCrdClient::new();
        let expected = CrdCatalog::list().dependencies();

        let missing = filter_missing(&client, expected.clone()).await.unwrap();
        assert_eq!(missing, expected);
        assert_eq!(client.operation_counts().gets, 3);
    }

    #[tokio::test]
    async fn test_all_present_yields_empty() {
        let client = MockCrdClient::new()
            .with_present("helmreleases.helm.cattle.io", &["v1alpha1"])
            .with_present("helmcharts.helm.cattle.io", &["v1"])
            .with_present("helmchartconfigs.helm.cattle.io", &["v1"]);

        let missing = filter_missing(&client, CrdCatalog::list().dependencies())
            .await
            .unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_query_error_aborts() {
        // The first definition errors; the second (checked first) is resolvable
        let client = MockCrdClient::new()
            .with_query_error("helmcharts.helm.cattle.io", "connection refused")
            .with_present("helmchartconfigs.helm.cattle.io", &["v1"]);

        let err = filter_missing(&client, CrdCatalog::list().controller_deps)
            .await
            .unwrap_err();

        match err {
            CrdError::CrdQuery { name, reason } => {
                assert_eq!(name, "helmcharts.helm.cattle.io");
                assert!(reason.contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_query_error_stops_iteration() {
        // Checked last to first: helmchartconfigs errors before helmcharts is queried
        let client = MockCrdClient::new()
            .with_query_error("helmchartconfigs.helm.cattle.io", "forbidden");

        assert!(
            filter_missing(&client, CrdCatalog::list().controller_deps)
                .await
                .is_err()
        );
        assert_eq!(client.operation_counts().gets, 1);
    }

    #[tokio::test]
    async fn test_empty_stored_versions_is_indeterminate() {
        let client = MockCrdClient::new().with_present("helmreleases.helm.cattle.io", &[]);

        let state = query_state(&client, "helmreleases.helm.cattle.io").await;
        assert!(matches!(state, CrdState::Indeterminate { .. }));
        assert!(!state.is_present());

        let result = filter_missing(&client, CrdCatalog::list().locker_deps).await;
        assert!(matches!(result, Err(CrdError::CrdQuery { .. })));
    }

    #[tokio::test]
    async fn test_query_state_present() {
        let client = MockCrdClient::new().with_present("helmcharts.helm.cattle.io", &["v1", "v2"]);
        assert_eq!(
            query_state(&client, "helmcharts.helm.cattle.io").await,
            CrdState::Present {
                stored_version: "v1".to_string()
            }
        );
        assert_eq!(
            query_state(&client, "other.helm.cattle.io").await,
            CrdState::Absent
        );
    }
}
