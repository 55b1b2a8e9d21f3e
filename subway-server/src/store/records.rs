//! Serialisable records for stations and lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Distance, LineId, StationId};

/// A registered station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: StationId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One stored segment, referring to its stations by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: Distance,
}

/// A stored line with its full segment set, in path order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub sections: Vec<SectionRecord>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl LineRecord {
    /// Returns true if any section starts or ends at `station`.
    pub fn touches(&self, station: StationId) -> bool {
        self.sections
            .iter()
            .any(|s| s.up_station_id == station || s.down_station_id == station)
    }
}

/// Everything the service persists, written and read as one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub next_station_id: u64,
    pub next_line_id: u64,
    pub stations: Vec<StationRecord>,
    pub lines: Vec<LineRecord>,
}
