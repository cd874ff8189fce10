//! Error types for hpo-kube

use std::path::PathBuf;

use thiserror::Error;

/// Result type for hpo-kube operations
pub type Result<T> = std::result::Result<T, CrdError>;

/// Errors that can occur while planning, installing or exporting CRDs
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CrdError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// The cluster could not say whether a CRD exists
    #[error("failed to check CRD {name}: {reason}")]
    CrdQuery { name: String, reason: String },

    /// One or more CRDs in a batch could not be created or never became established
    #[error("failed to create {} CRD(s): {}", .failures.len(), format_failures(.failures))]
    BatchCreate { failures: Vec<(String, String)> },

    /// Two definitions with the same group and kind ended up in one plan
    #[error("CRD {name} appears more than once in the installation plan")]
    DuplicateDefinition { name: String },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Writing one exported file failed
    #[error("failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A background task ended without reporting a result
    #[error("task failed: {0}")]
    Task(String),

    /// Timeout
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// The watch behind a condition wait broke off
    #[error("failed to watch CRD: {0}")]
    Wait(#[from] kube::runtime::wait::Error),

    /// The Kubernetes distribution could not be identified
    #[error("failed to identify Kubernetes runtime: {0}")]
    RuntimeDetection(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(name, reason)| format!("{}: {}", name, reason))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_yaml::Error> for CrdError {
    fn from(e: serde_yaml::Error) -> Self {
        CrdError::Serialization(e.to_string())
    }
}

impl CrdError {
    /// Check if this is a Kubernetes 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, CrdError::Api(kube::Error::Api(resp)) if resp.code == 404)
    }

    /// Names of the CRDs that failed in a batch, if this is a batch error
    pub fn failed_crds(&self) -> Vec<&str> {
        match self {
            CrdError::BatchCreate { failures } => {
                failures.iter().map(|(name, _)| name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16) -> CrdError {
        CrdError::Api(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: "Test".to_string(),
            code,
        }))
    }

    #[test]
    fn test_is_not_found() {
        assert!(api_error(404).is_not_found());
        assert!(!api_error(500).is_not_found());
        assert!(!CrdError::Timeout("x".to_string()).is_not_found());
    }

    #[test]
    fn test_batch_create_message() {
        let err = CrdError::BatchCreate {
            failures: vec![
                ("a.example.com".to_string(), "denied".to_string()),
                ("b.example.com".to_string(), "timeout".to_string()),
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to create 2 CRD(s)"));
        assert!(message.contains("a.example.com: denied"));
        assert!(message.contains("b.example.com: timeout"));
        assert_eq!(err.failed_crds(), vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn test_crd_query_names_the_resource() {
        let err = CrdError::CrdQuery {
            name: "helmcharts.helm.cattle.io".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to check CRD helmcharts.helm.cattle.io: connection refused"
        );
    }
}
