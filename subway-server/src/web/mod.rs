//! Web layer for the subway line service.
//!
//! Provides HTTP endpoints for managing stations, lines, and line sections.

mod dto;
mod routes;
mod state;


pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
