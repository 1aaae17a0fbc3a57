//! The upstream transit-data seam.

use std::future::Future;

use serde_json::Value;

use super::error::UpstreamError;
use super::types::{BoardKind, BoardOptions, Location, LocationOptions};

/// Source of locations and station boards.
///
/// Implemented by [`DbRestClient`](super::DbRestClient) for the live API and
/// by [`MockProvider`](super::MockProvider) for fixtures and tests. The
/// board service is generic over this trait, so the handle is injected
/// rather than shared globally.
pub trait TransitProvider: Send + Sync {
    /// Search stations, stops, addresses and POIs by name.
    fn locations(
        &self,
        query: &str,
        options: &LocationOptions,
    ) -> impl Future<Output = Result<Vec<Location>, UpstreamError>> + Send;

    /// Fetch the raw departures or arrivals for a stop.
    ///
    /// The upstream decides the lookahead window; callers narrow it.
    fn schedule(
        &self,
        kind: BoardKind,
        station_id: &str,
        options: &BoardOptions,
    ) -> impl Future<Output = Result<Vec<Value>, UpstreamError>> + Send;
}
