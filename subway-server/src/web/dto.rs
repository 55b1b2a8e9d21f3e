//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{LineId, Station, StationId};
use crate::service::{LineView, SectionView};
use crate::store::StationRecord;

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    pub name: String,
}

/// A registered station.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
pub struct CreateLineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

/// Request to rename or recolour a line.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub name: String,
    pub color: String,
}

/// Request to attach a section to a line.
#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

/// Query for removing a station from a line.
#[derive(Debug, Deserialize)]
pub struct RemoveSectionQuery {
    pub station_id: StationId,
}

/// Station information inside a line.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub id: StationId,
    pub name: String,
}

/// One section of a line, in path order.
#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub up_station: StationSummary,
    pub down_station: StationSummary,
    pub distance: u64,
}

/// A line with its stations in path order.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<StationSummary>,
    pub sections: Vec<SectionResponse>,
    pub total_distance: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<StationRecord> for StationResponse {
    fn from(r: StationRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
        }
    }
}

impl From<&Station> for StationSummary {
    fn from(s: &Station) -> Self {
        Self {
            id: s.id(),
            name: s.name().to_string(),
        }
    }
}

impl From<&SectionView> for SectionResponse {
    fn from(s: &SectionView) -> Self {
        Self {
            up_station: (&s.up).into(),
            down_station: (&s.down).into(),
            distance: s.distance,
        }
    }
}

impl From<LineView> for LineResponse {
    fn from(v: LineView) -> Self {
        Self {
            id: v.id,
            name: v.name,
            color: v.color,
            stations: v.stations.iter().map(StationSummary::from).collect(),
            sections: v.sections.iter().map(SectionResponse::from).collect(),
            total_distance: v.total_distance,
            created_at: v.created_at,
            modified_at: v.modified_at,
        }
    }
}
