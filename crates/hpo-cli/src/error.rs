//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use hpo_kube::CrdError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// The cluster could not be queried or refused a change
    #[error("Cluster error: {message}")]
    #[diagnostic(code(hpo::cli::cluster))]
    Cluster {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// CRDs could not be rendered
    #[error("Export error: {message}")]
    #[diagnostic(code(hpo::cli::export))]
    Export { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(hpo::cli::io))]
    Io { message: String },

    /// Anything else
    #[error("{message}")]
    #[diagnostic(code(hpo::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Export { .. } => exit_codes::EXPORT_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a cluster error with help text
    pub fn cluster_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Cluster {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CrdError> for CliError {
    fn from(err: CrdError) -> Self {
        let message = err.to_string();
        match err {
            CrdError::CrdQuery { .. } => CliError::Cluster {
                message,
                help: Some("Nothing was installed. Check cluster connectivity and retry.".to_string()),
            },
            CrdError::BatchCreate { .. } => CliError::Cluster {
                message,
                help: Some("CRDs created before the failure remain installed.".to_string()),
            },
            CrdError::Api(_)
            | CrdError::Timeout(_)
            | CrdError::Wait(_)
            | CrdError::RuntimeDetection(_) => {
                CliError::Cluster {
                    message,
                    help: None,
                }
            }
            CrdError::Serialization(_) => CliError::Export { message },
            CrdError::Io(_) | CrdError::WriteFile { .. } => CliError::Io { message },
            _ => CliError::Other { message },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
