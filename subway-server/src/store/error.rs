//! Storage error types.

use crate::domain::{LineId, TopologyError};
use crate::stations::StationError;

/// Errors from loading or saving lines.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No line has this identifier
    #[error("line {0} not found")]
    LineNotFound(LineId),

    /// A stored section refers to a station the registry does not know
    #[error("stored line {line} is inconsistent: {source}")]
    DanglingStation {
        line: LineId,
        #[source]
        source: StationError,
    },

    /// Stored sections do not form a valid topology
    #[error("stored line {line} is inconsistent: {source}")]
    Corrupt {
        line: LineId,
        #[source]
        source: TopologyError,
    },

    /// Snapshot file could not be read or written
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}
