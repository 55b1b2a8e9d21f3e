//! Line type.
//!
//! A `Line` is a named, coloured owner of exactly one [`Topology`]. It adds no
//! validation of its own; every topology failure is passed through unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Segment, Station, StationId, Topology, TopologyError};

/// Identifier of a line, allocated by the line repository.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transit line and its track topology.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    topology: Topology,
}

impl Line {
    /// Creates a line seeded with its first segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::{Line, LineId, Segment, Station, StationId};
    ///
    /// let a = Station::new(StationId(1), "A");
    /// let b = Station::new(StationId(2), "B");
    /// let c = Station::new(StationId(3), "C");
    ///
    /// let mut line = Line::new(LineId(1), "Green", "green", Segment::new(a, b, 10).unwrap());
    /// line.add_station(Station::new(StationId(1), "A"), c, 4).unwrap();
    ///
    /// let names: Vec<_> = line.stations().unwrap().iter().map(|s| s.name().to_string()).collect();
    /// assert_eq!(names, ["A", "C", "B"]);
    /// ```
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        first: Segment,
    ) -> Self {
        Self::from_parts(id, name, color, Topology::seeded(first))
    }

    /// Reassembles a line from a topology that has already been validated.
    pub fn from_parts(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        topology: Topology,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            topology,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Renames and recolours the line.
    pub fn update_info(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.name = name.into();
        self.color = color.into();
    }

    /// Builds a segment and adds it to the topology.
    pub fn add_station(
        &mut self,
        up: Station,
        down: Station,
        distance: i64,
    ) -> Result<(), TopologyError> {
        let segment = Segment::new(up, down, distance)?;
        self.topology.add_segment(segment)
    }

    /// Removes a station, merging its neighbours if it was interior.
    pub fn remove_station(&mut self, station: StationId) -> Result<(), TopologyError> {
        self.topology.remove_station(station)
    }

    /// Returns the stations in path order.
    pub fn stations(&self) -> Result<Vec<Station>, TopologyError> {
        self.topology.stations()
    }

    /// Returns the segments in path order.
    pub fn sections(&self) -> Result<Vec<&Segment>, TopologyError> {
        self.topology.ordered_segments()
    }

    /// Returns true if `station` is anywhere on the line.
    pub fn serves(&self, station: StationId) -> bool {
        self.topology.contains_station(station)
    }
}
