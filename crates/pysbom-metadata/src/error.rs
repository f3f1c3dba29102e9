//! Metadata engine error types.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while resolving package metadata.
///
/// Per-package failures (`Fetch`, `FetchTimeout`, `LicenseUnavailable`) are
/// absorbed into the records they affect. Only the structural variants are
/// returned to callers of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The metadata source could not produce text for a package.
    #[error("failed to fetch metadata for '{name}': {detail}")]
    Fetch { name: String, detail: String },

    /// The metadata source did not answer in time.
    #[error("metadata fetch for '{name}' timed out after {after:?}")]
    FetchTimeout { name: String, after: Duration },

    /// No license file or declaration could be read.
    #[error("license information unavailable at {path}: {detail}")]
    LicenseUnavailable { path: PathBuf, detail: String },

    /// The project's own package could not be resolved.
    #[error("root module resolution failed: {reason}")]
    RootModuleUnresolved { reason: String },

    /// An operation that needs a root module was given no modules.
    #[error("{operation} requires a non-empty module list")]
    EmptyModuleList { operation: &'static str },

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;
