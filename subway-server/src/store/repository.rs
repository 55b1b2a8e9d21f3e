//! Line records keyed by identifier.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{Line, LineId, Segment, StationId, Topology, TopologyError};
use crate::stations::StationRegistry;

use super::error::StoreError;
use super::records::{LineRecord, SectionRecord};

/// Stored lines.
///
/// Records hold station identifiers only; [`LineRepository::load`] resolves
/// them against the registry and revalidates the topology every time.
#[derive(Debug, Clone)]
pub struct LineRepository {
    lines: BTreeMap<LineId, LineRecord>,
    next_id: u64,
}

impl Default for LineRepository {
    fn default() -> Self {
        Self {
            lines: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl LineRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a repository from stored records.
    pub fn from_records(records: Vec<LineRecord>, next_id: u64) -> Self {
        let highest = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        let lines = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            lines,
            next_id: next_id.max(highest + 1),
        }
    }

    /// Returns every record in identifier order.
    pub fn records(&self) -> Vec<LineRecord> {
        self.lines.values().cloned().collect()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Reserve an identifier for a line about to be created.
    pub fn allocate_id(&mut self) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: LineId) -> Option<&LineRecord> {
        self.lines.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineRecord> {
        self.lines.values()
    }

    /// Returns true if a line other than `except` already uses `name`.
    pub fn name_taken(&self, name: &str, except: Option<LineId>) -> bool {
        self.lines
            .values()
            .any(|r| r.name == name && Some(r.id) != except)
    }

    /// Returns the first line that has `station` on it.
    pub fn line_serving(&self, station: StationId) -> Option<LineId> {
        self.lines.values().find(|r| r.touches(station)).map(|r| r.id)
    }

    /// Rebuild a line from its record.
    pub fn load(&self, id: LineId, stations: &StationRegistry) -> Result<Line, StoreError> {
        let record = self.lines.get(&id).ok_or(StoreError::LineNotFound(id))?;

        let segments = record
            .sections
            .iter()
            .map(|s| {
                let up = stations
                    .resolve(s.up_station_id)
                    .map_err(|source| StoreError::DanglingStation { line: id, source })?;
                let down = stations
                    .resolve(s.down_station_id)
                    .map_err(|source| StoreError::DanglingStation { line: id, source })?;
                Segment::with_distance(up, down, s.distance)
                    .map_err(|source| StoreError::Corrupt { line: id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let topology = Topology::from_segments(segments)
            .map_err(|source| StoreError::Corrupt { line: id, source })?;

        Ok(Line::from_parts(
            id,
            record.name.clone(),
            record.color.clone(),
            topology,
        ))
    }

    /// Replace the stored record for `line` with its current state.
    ///
    /// Sections are written in path order. The creation time of an existing
    /// record is kept.
    pub fn save(&mut self, line: &Line, now: DateTime<Utc>) -> Result<(), TopologyError> {
        let sections = line
            .sections()?
            .into_iter()
            .map(|s| SectionRecord {
                up_station_id: s.up().id(),
                down_station_id: s.down().id(),
                distance: s.distance(),
            })
            .collect();

        let created_at = self
            .lines
            .get(&line.id())
            .map(|r| r.created_at)
            .unwrap_or(now);

        self.lines.insert(
            line.id(),
            LineRecord {
                id: line.id(),
                name: line.name().to_string(),
                color: line.color().to_string(),
                sections,
                created_at,
                modified_at: now,
            },
        );
        Ok(())
    }

    /// Delete a line record.
    pub fn remove(&mut self, id: LineId) -> Result<LineRecord, StoreError> {
        self.lines.remove(&id).ok_or(StoreError::LineNotFound(id))
    }
}
