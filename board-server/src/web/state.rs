//! Application state for the web layer.

use std::sync::Arc;

use crate::board::StationService;

/// Shared application state.
pub struct AppState<P> {
    /// Station search and boards
    pub stations: Arc<StationService<P>>,

    /// Upper bound on the `limit` a client may request
    pub max_search_limit: usize,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(stations: StationService<P>, max_search_limit: usize) -> Self {
        Self {
            stations: Arc::new(stations),
            max_search_limit,
        }
    }
}

// Not derived: a derive would require `P: Clone`.
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            stations: Arc::clone(&self.stations),
            max_search_limit: self.max_search_limit,
        }
    }
}
