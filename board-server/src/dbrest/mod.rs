//! db-rest upstream client.
//!
//! This module provides access to the transit-data provider behind the
//! board server: a db-rest instance, which wraps Deutsche Bahn's journey
//! planner in a plain JSON API.
//!
//! Key characteristics of db-rest:
//! - `/locations` mixes stations, stops, addresses and POIs
//! - `/stops/{id}/departures` and `/arrivals` return a fixed lookahead
//!   window; narrowing it to the caller's window happens in [`crate::board`]
//! - Timestamps are RFC 3339 with a UTC offset

mod client;
mod error;
mod mock;
mod provider;
mod types;

pub use client::{DbRestClient, DbRestConfig};
pub use error::UpstreamError;
pub use mock::{MockFailure, MockProvider, MockRequest};
pub use provider::TransitProvider;
pub use types::{
    BoardKind, BoardOptions, Coordinates, Line, Location, LocationOptions, ProductFlags,
    RawEvent, ScheduleResponse,
};
