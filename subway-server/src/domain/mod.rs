//! Domain types for line topology.
//!
//! This module holds the pure core: stations as the topology sees them,
//! segments, the validated segment collection of one line, and the line
//! itself. All types enforce their invariants at construction or mutation
//! time and never touch storage or transport.

mod distance;
mod error;
mod line;
mod segment;
mod station;
mod topology;


pub use distance::Distance;
pub use error::TopologyError;
pub use line::{Line, LineId};
pub use segment::{Segment, SharedEnd};
pub use station::{Station, StationId};
pub use topology::Topology;
