//! Web layer for the station board server.
//!
//! Exposes station autocomplete and station boards as JSON over HTTP.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
