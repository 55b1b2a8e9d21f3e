//! In-memory station registry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{Station, StationId};
use crate::store::StationRecord;

use super::error::StationError;

/// Station lookup keyed by identifier, with unique names.
///
/// Identifiers are allocated sequentially from 1 and never reused, even
/// after a station is deleted.
#[derive(Debug, Clone)]
pub struct StationRegistry {
    stations: BTreeMap<StationId, StationRecord>,
    next_id: u64,
}

impl Default for StationRegistry {
    fn default() -> Self {
        Self {
            stations: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl StationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a registry from stored records.
    ///
    /// `next_id` is raised past the highest stored identifier if needed.
    pub fn from_records(records: Vec<StationRecord>, next_id: u64) -> Self {
        let highest = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        let stations = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            stations,
            next_id: next_id.max(highest + 1),
        }
    }

    /// Returns every record in identifier order.
    pub fn records(&self) -> Vec<StationRecord> {
        self.stations.values().cloned().collect()
    }

    /// Returns the identifier the next created station will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Get the number of registered stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Register a new station.
    ///
    /// The name is trimmed and must be non-empty and unused.
    pub fn create(&mut self, name: &str, now: DateTime<Utc>) -> Result<StationRecord, StationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StationError::EmptyName);
        }
        if self.stations.values().any(|r| r.name == name) {
            return Err(StationError::DuplicateName(name.to_string()));
        }

        let record = StationRecord {
            id: StationId(self.next_id),
            name: name.to_string(),
            created_at: now,
        };
        self.next_id += 1;
        self.stations.insert(record.id, record.clone());
        Ok(record)
    }

    /// Look up a station by identifier.
    pub fn resolve(&self, id: StationId) -> Result<Station, StationError> {
        self.stations
            .get(&id)
            .map(|r| Station::new(r.id, r.name.clone()))
            .ok_or(StationError::NotFound(id))
    }

    /// Get a stored record by identifier.
    pub fn get(&self, id: StationId) -> Option<&StationRecord> {
        self.stations.get(&id)
    }

    /// Iterate over all records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &StationRecord> {
        self.stations.values()
    }

    /// Remove a station.
    ///
    /// Callers must check that no line still uses it.
    pub fn delete(&mut self, id: StationId) -> Result<StationRecord, StationError> {
        self.stations.remove(&id).ok_or(StationError::NotFound(id))
    }
}
