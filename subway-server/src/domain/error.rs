//! Domain error types.
//!
//! These errors represent validation failures and consistency faults in
//! the line topology. They are distinct from registry, storage, and HTTP
//! errors, which wrap them.

use super::StationId;

/// Failures raised by segment construction and topology mutation.
///
/// Every kind except [`TopologyError::BrokenChain`] is a caller-recoverable
/// validation failure; a failed operation never leaves partial changes behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Segment length was zero or negative
    #[error("distance must be positive, got {0}")]
    InvalidDistance(i64),

    /// Segment would start and end at the same station
    #[error("segment cannot start and end at station {0}")]
    SameStation(StationId),

    /// Both endpoints of the new segment are already on the line
    #[error("stations {up} and {down} are both already on the line")]
    BothStationsExist { up: StationId, down: StationId },

    /// Neither endpoint of the new segment is on the line
    #[error("neither station {up} nor {down} is on the line")]
    NeitherStationExists { up: StationId, down: StationId },

    /// The new segment does not fit inside the segment it would split
    #[error("distance {requested} does not fit inside existing segment of length {existing}")]
    DistanceTooLarge { existing: u64, requested: u64 },

    /// The line would grow past the longest representable length
    #[error("line length would exceed {}", super::Distance::MAX)]
    DistanceOverflow,

    /// Removal attempted on a line that has a single segment left
    #[error("cannot remove a station from a line with only one segment")]
    SingleSegmentRemaining,

    /// Removal target is not an endpoint of any segment
    #[error("station {0} is not on the line")]
    StationNotOnLine(StationId),

    /// The stored segments do not form a single path
    #[error("segments do not form a single path: {0}")]
    BrokenChain(&'static str),
}

impl TopologyError {
    /// Returns true for data-integrity faults, as opposed to bad input.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(self, TopologyError::BrokenChain(_))
    }
}
