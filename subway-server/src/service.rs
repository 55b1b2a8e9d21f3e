//! Line and station operations.
//!
//! Every mutation follows the same shape: take the lock, copy the current
//! state, load the affected line, apply the domain operation, write the
//! record back, persist the snapshot, and only then publish the copy.
//! A failure anywhere along the way drops the copy, so callers never see a
//! half-applied change in memory or on disk.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{Line, LineId, Segment, Station, StationId, TopologyError};
use crate::stations::{StationError, StationRegistry};
use crate::store::{LineRecord, LineRepository, Snapshot, SnapshotFile, StationRecord, StoreError};

/// Errors from service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("line {0} not found")]
    LineNotFound(LineId),

    #[error("line name already exists: {0}")]
    DuplicateLineName(String),

    #[error("line name cannot be empty")]
    EmptyLineName,

    #[error("station {station} is still on line {line}")]
    StationInUse { station: StationId, line: LineId },

    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::LineNotFound(id) => ServiceError::LineNotFound(id),
            other => ServiceError::Storage(other),
        }
    }
}

/// Request to create a line together with its first section.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: i64,
}

/// One section of a line, in path order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub up: Station,
    pub down: Station,
    pub distance: u64,
}

/// A line as presented to callers.
#[derive(Debug, Clone)]
pub struct LineView {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<Station>,
    pub sections: Vec<SectionView>,
    pub total_distance: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl LineView {
    fn new(line: &Line, record: &LineRecord) -> Result<Self, TopologyError> {
        let sections = line
            .sections()?
            .into_iter()
            .map(|s| SectionView {
                up: s.up().clone(),
                down: s.down().clone(),
                distance: s.distance().get(),
            })
            .collect();

        Ok(Self {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            stations: line.stations()?,
            sections,
            total_distance: line.topology().total_distance(),
            created_at: record.created_at,
            modified_at: record.modified_at,
        })
    }

    /// Station names in path order.
    pub fn station_names(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.name()).collect()
    }
}

#[derive(Debug, Clone, Default)]
struct State {
    stations: StationRegistry,
    lines: LineRepository,
}

impl State {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            stations: StationRegistry::from_records(snapshot.stations, snapshot.next_station_id),
            lines: LineRepository::from_records(snapshot.lines, snapshot.next_line_id),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            next_station_id: self.stations.next_id(),
            next_line_id: self.lines.next_id(),
            stations: self.stations.records(),
            lines: self.lines.records(),
        }
    }

    fn load(&self, id: LineId) -> Result<Line, ServiceError> {
        Ok(self.lines.load(id, &self.stations)?)
    }

    fn view(&self, id: LineId) -> Result<LineView, ServiceError> {
        let line = self.load(id)?;
        let record = self.lines.get(id).ok_or(ServiceError::LineNotFound(id))?;
        Ok(LineView::new(&line, record)?)
    }

    fn save(&mut self, line: &Line, now: DateTime<Utc>) -> Result<LineView, ServiceError> {
        self.lines.save(line, now)?;
        self.view(line.id())
    }
}

/// Entry point for every station and line operation.
///
/// Cheap to clone; clones share state. All mutations are serialised by a
/// single lock, so at most one change is in flight at a time.
#[derive(Clone)]
pub struct SubwayService {
    state: Arc<Mutex<State>>,
    snapshot: Option<SnapshotFile>,
}

impl SubwayService {
    /// Create a service that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            snapshot: None,
        }
    }

    /// Create a service backed by a snapshot file, loading it if present.
    ///
    /// Every stored line is revalidated; a snapshot holding a broken line is
    /// rejected rather than served.
    pub fn open(file: SnapshotFile) -> Result<Self, ServiceError> {
        let state = match file.load()? {
            Some(snapshot) => State::from_snapshot(snapshot),
            None => State::default(),
        };

        for record in state.lines.iter() {
            state.lines.load(record.id, &state.stations)?;
        }

        info!(
            path = %file.path().display(),
            stations = state.stations.len(),
            lines = state.lines.len(),
            "loaded snapshot"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            snapshot: Some(file),
        })
    }

    /// Apply `f` to a copy of the state and publish it only if `f` and the
    /// snapshot write both succeed.
    async fn transact<T>(
        &self,
        f: impl FnOnce(&mut State, DateTime<Utc>) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut guard = self.state.lock().await;
        let mut staged = guard.clone();
        let value = f(&mut staged, Utc::now())?;

        // Saved under the lock so the file never lags the published state.
        if let Some(file) = &self.snapshot {
            file.save(&staged.snapshot())?;
        }

        *guard = staged;
        Ok(value)
    }

    pub async fn create_station(&self, name: &str) -> Result<StationRecord, ServiceError> {
        let record = self
            .transact(|state, now| Ok(state.stations.create(name, now)?))
            .await?;
        info!(station = %record.id, name = %record.name, "created station");
        Ok(record)
    }

    pub async fn list_stations(&self) -> Vec<StationRecord> {
        self.state.lock().await.stations.records()
    }

    /// Delete a station that no line uses.
    pub async fn delete_station(&self, id: StationId) -> Result<(), ServiceError> {
        self.transact(|state, _| {
            if let Some(line) = state.lines.line_serving(id) {
                return Err(ServiceError::StationInUse { station: id, line });
            }
            state.stations.delete(id)?;
            Ok(())
        })
        .await?;
        info!(station = %id, "deleted station");
        Ok(())
    }

    /// Create a line with its first section.
    pub async fn create_line(&self, req: NewLine) -> Result<LineView, ServiceError> {
        let view = self
            .transact(|state, now| {
                let name = req.name.trim();
                if name.is_empty() {
                    return Err(ServiceError::EmptyLineName);
                }
                if state.lines.name_taken(name, None) {
                    return Err(ServiceError::DuplicateLineName(name.to_string()));
                }

                let up = state.stations.resolve(req.up_station)?;
                let down = state.stations.resolve(req.down_station)?;
                let first = Segment::new(up, down, req.distance)?;

                let id = state.lines.allocate_id();
                let line = Line::new(id, name, req.color.trim(), first);
                state.save(&line, now)
            })
            .await?;
        info!(line = %view.id, name = %view.name, "created line");
        Ok(view)
    }

    pub async fn list_lines(&self) -> Result<Vec<LineView>, ServiceError> {
        let state = self.state.lock().await;
        state.lines.iter().map(|r| state.view(r.id)).collect()
    }

    pub async fn get_line(&self, id: LineId) -> Result<LineView, ServiceError> {
        self.state.lock().await.view(id)
    }

    /// Rename and recolour a line.
    pub async fn update_line(
        &self,
        id: LineId,
        name: &str,
        color: &str,
    ) -> Result<LineView, ServiceError> {
        let view = self
            .transact(|state, now| {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ServiceError::EmptyLineName);
                }
                let mut line = state.load(id)?;
                if state.lines.name_taken(name, Some(id)) {
                    return Err(ServiceError::DuplicateLineName(name.to_string()));
                }
                line.update_info(name, color.trim());
                state.save(&line, now)
            })
            .await?;
        info!(line = %id, name = %view.name, "updated line");
        Ok(view)
    }

    pub async fn delete_line(&self, id: LineId) -> Result<(), ServiceError> {
        self.transact(|state, _| {
            state.lines.remove(id)?;
            Ok(())
        })
        .await?;
        info!(line = %id, "deleted line");
        Ok(())
    }

    /// Attach a section to a line, splitting an existing one if needed.
    pub async fn add_section(
        &self,
        line_id: LineId,
        up: StationId,
        down: StationId,
        distance: i64,
    ) -> Result<LineView, ServiceError> {
        let view = self
            .transact(|state, now| {
                let mut line = state.load(line_id)?;
                let up = state.stations.resolve(up)?;
                let down = state.stations.resolve(down)?;
                let before = line.topology().len();

                line.add_station(up, down, distance)?;

                debug!(
                    line = %line_id,
                    segments_before = before,
                    segments_after = line.topology().len(),
                    "added section"
                );
                state.save(&line, now)
            })
            .await?;
        info!(line = %line_id, up = %up, down = %down, distance, "added section");
        Ok(view)
    }

    /// Remove a station from a line, merging its neighbours if it was interior.
    pub async fn remove_station(
        &self,
        line_id: LineId,
        station: StationId,
    ) -> Result<LineView, ServiceError> {
        let view = self
            .transact(|state, now| {
                let mut line = state.load(line_id)?;
                let interior = line.topology().segment_from(station).is_some()
                    && line.topology().segment_to(station).is_some();

                line.remove_station(station)?;

                debug!(line = %line_id, station = %station, interior, "removed station");
                state.save(&line, now)
            })
            .await?;
        info!(line = %line_id, station = %station, "removed station from line");
        Ok(view)
    }
}
