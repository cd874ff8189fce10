//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Cluster error - the API server could not be reached or refused a request
pub const CLUSTER_ERROR: i32 = 3;

/// Export error - CRDs could not be rendered
pub const EXPORT_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
