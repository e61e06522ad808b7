//! Error types for the fleet inventory.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("duplicate instance id: {0}")]
    DuplicateInstance(String),

    #[error("duplicate target group: {0}")]
    DuplicateTargetGroup(String),
}
