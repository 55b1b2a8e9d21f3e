//! Station registry error types.

use crate::domain::StationId;

/// Errors that can occur when creating, resolving, or deleting stations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationError {
    /// No station has this identifier
    #[error("station {0} not found")]
    NotFound(StationId),

    /// Another station already uses this name
    #[error("station name already exists: {0}")]
    DuplicateName(String),

    /// Name was empty after trimming
    #[error("station name cannot be empty")]
    EmptyName,
}
