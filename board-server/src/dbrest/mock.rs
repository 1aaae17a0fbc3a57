//! Mock transit provider for running without the live API.
//!
//! Serves locations and boards from JSON fixtures or from data set up in
//! code, and can be scripted to fail or respond slowly.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use super::error::UpstreamError;
use super::provider::TransitProvider;
use super::types::{BoardKind, BoardOptions, Location, LocationOptions, ScheduleResponse};

/// Fixture file holding the search results.
const LOCATIONS_FILE: &str = "locations.json";

/// A scripted upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Respond as if the stop does not exist (404)
    NotFound,
    /// Respond with 429, optionally with a `Retry-After`
    RateLimited(Option<u64>),
    /// Respond with an arbitrary error status
    Status(u16),
    /// Respond with an unparseable body
    Malformed,
}

impl MockFailure {
    fn to_error(self) -> UpstreamError {
        match self {
            MockFailure::NotFound => UpstreamError::NotFound,
            MockFailure::RateLimited(retry_after) => UpstreamError::RateLimited { retry_after },
            MockFailure::Status(status) => UpstreamError::Api {
                status,
                message: format!("mock failure with status {status}"),
            },
            MockFailure::Malformed => UpstreamError::Json {
                message: "expected value at line 1 column 1".to_string(),
                body: Some("<html>".to_string()),
            },
        }
    }
}

/// A request received by the mock, for assertions in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum MockRequest {
    Locations {
        query: String,
        options: LocationOptions,
    },
    Schedule {
        kind: BoardKind,
        station_id: String,
        options: BoardOptions,
    },
}

/// Mock provider serving canned data.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    /// Returned for every search, truncated to the requested result count.
    locations: Vec<Location>,

    /// Board events keyed by station ID and side.
    boards: HashMap<(String, BoardKind), Vec<Value>>,

    location_failure: Option<MockFailure>,
    board_failures: HashMap<BoardKind, MockFailure>,

    /// Delay applied to every response.
    latency: Duration,

    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockProvider {
    /// Create an empty mock: searches return nothing and every station is
    /// unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a directory.
    ///
    /// Reads `locations.json` (a JSON array of locations, optional) and any
    /// `{stationId}.departures.json` / `{stationId}.arrivals.json` files,
    /// which hold db-rest board responses.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, UpstreamError> {
        let data_dir = data_dir.as_ref();
        let mut mock = Self::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            UpstreamError::Fixture(format!("failed to read {}: {e}", data_dir.display()))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| UpstreamError::Fixture(format!("failed to read entry: {e}")))?
                .path();

            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if !path.is_file() || !file_name.ends_with(".json") {
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| {
                UpstreamError::Fixture(format!("failed to read {}: {e}", path.display()))
            })?;

            if file_name == LOCATIONS_FILE {
                mock.locations = serde_json::from_str(&json).map_err(|e| {
                    UpstreamError::Fixture(format!("failed to parse {}: {e}", path.display()))
                })?;
                continue;
            }

            let stem = file_name.trim_end_matches(".json");
            let (station_id, kind) = if let Some(id) = stem.strip_suffix(".departures") {
                (id, BoardKind::Departures)
            } else if let Some(id) = stem.strip_suffix(".arrivals") {
                (id, BoardKind::Arrivals)
            } else {
                continue;
            };

            let response: ScheduleResponse = serde_json::from_str(&json).map_err(|e| {
                UpstreamError::Fixture(format!("failed to parse {}: {e}", path.display()))
            })?;
            let events = response.into_events(kind).ok_or_else(|| {
                UpstreamError::Fixture(format!(
                    "{} has no `{}` array",
                    path.display(),
                    kind.as_str()
                ))
            })?;

            mock.boards.insert((station_id.to_string(), kind), events);
        }

        if mock.locations.is_empty() && mock.boards.is_empty() {
            return Err(UpstreamError::Fixture(format!(
                "no fixture files found in {}",
                data_dir.display()
            )));
        }

        Ok(mock)
    }

    /// Set the search results.
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    /// Set one side of a station's board.
    pub fn with_board(
        mut self,
        station_id: impl Into<String>,
        kind: BoardKind,
        events: Vec<Value>,
    ) -> Self {
        self.boards.insert((station_id.into(), kind), events);
        self
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make searches fail.
    pub fn fail_locations(mut self, failure: MockFailure) -> Self {
        self.location_failure = Some(failure);
        self
    }

    /// Make one side of every board fail.
    pub fn fail_board(mut self, kind: BoardKind, failure: MockFailure) -> Self {
        self.board_failures.insert(kind, failure);
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of upstream calls received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn record(&self, request: MockRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl TransitProvider for MockProvider {
    async fn locations(
        &self,
        query: &str,
        options: &LocationOptions,
    ) -> Result<Vec<Location>, UpstreamError> {
        self.record(MockRequest::Locations {
            query: query.to_string(),
            options: *options,
        });
        self.wait().await;

        if let Some(failure) = self.location_failure {
            return Err(failure.to_error());
        }

        Ok(self
            .locations
            .iter()
            .take(options.results)
            .cloned()
            .collect())
    }

    async fn schedule(
        &self,
        kind: BoardKind,
        station_id: &str,
        options: &BoardOptions,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.record(MockRequest::Schedule {
            kind,
            station_id: station_id.to_string(),
            options: *options,
        });
        self.wait().await;

        if let Some(failure) = self.board_failures.get(&kind) {
            return Err(failure.to_error());
        }

        self.boards
            .get(&(station_id.to_string(), kind))
            .cloned()
            .ok_or(UpstreamError::NotFound)
    }
}
