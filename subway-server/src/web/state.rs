//! Application state for the web layer.

use crate::service::SubwayService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Station and line operations
    pub service: SubwayService,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: SubwayService) -> Self {
        Self { service }
    }
}
