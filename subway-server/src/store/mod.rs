//! Persistence for stations and lines.
//!
//! The domain never saves itself. The service loads a [`Line`] out of the
//! [`LineRepository`], mutates it, and only on success writes the whole
//! record back and refreshes the optional on-disk [`SnapshotFile`].
//!
//! [`Line`]: crate::domain::Line

mod error;
mod records;
mod repository;
mod snapshot;

pub use error::StoreError;
pub use records::{LineRecord, SectionRecord, Snapshot, StationRecord};
pub use repository::LineRepository;
pub use snapshot::SnapshotFile;
