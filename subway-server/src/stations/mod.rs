//! Station registry.
//!
//! Owns station identifiers and names. The topology only ever receives
//! stations that have already been resolved here.

mod error;
mod registry;

pub use error::StationError;
pub use registry::StationRegistry;
