//! Station search and board assembly.

use futures::future::try_join;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dbrest::{BoardKind, BoardOptions, LocationOptions, TransitProvider};

use super::duration::filter_by_duration;
use super::error::ServiceError;
use super::normalize::{BoardEntry, normalize};
use super::products::{serves_trains, train_products};

/// Location type kept by station search.
const STATION_TYPE: &str = "station";

/// A train station as returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
}

/// Combined departures and arrivals for one station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardResponse {
    pub departures: Vec<BoardEntry>,
    pub arrivals: Vec<BoardEntry>,
}

/// Tunable behaviour of the station service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Shortest accepted search query, in characters.
    pub min_query_len: usize,

    /// Search result count when the caller gives none.
    pub default_search_limit: usize,

    /// Board window in minutes when the caller gives none.
    pub default_board_minutes: f64,
}

impl ServiceConfig {
    /// Set the minimum query length.
    pub fn with_min_query_len(mut self, n: usize) -> Self {
        self.min_query_len = n;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_query_len: 1,
            default_search_limit: 25,
            default_board_minutes: 10.0,
        }
    }
}

/// Station search and boards on top of a transit provider.
#[derive(Debug, Clone)]
pub struct StationService<P> {
    provider: P,
    config: ServiceConfig,
}

impl<P: TransitProvider> StationService<P> {
    /// Create a service over `provider`.
    pub fn new(provider: P, config: ServiceConfig) -> Self {
        Self { provider, config }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Search for train stations by name.
    ///
    /// Returns at most `limit` stations (default 25), keeping only results
    /// that are stations served by at least one train class.
    pub async fn search_stations(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Station>, ServiceError> {
        if query.chars().count() < self.config.min_query_len.max(1) {
            return Err(ServiceError::invalid_query(query, self.config.min_query_len));
        }

        let options = LocationOptions {
            results: limit.unwrap_or(self.config.default_search_limit),
            fuzzy: true,
            poi: false,
            addresses: false,
            stops: true,
        };

        let locations = self
            .provider
            .locations(query, &options)
            .await
            .map_err(|e| ServiceError::from_upstream("station search", e))?;

        let total = locations.len();
        let stations: Vec<Station> = locations
            .into_iter()
            .filter(|l| l.kind == STATION_TYPE && serves_trains(l.products.as_ref()))
            .map(|l| Station {
                id: l.id,
                name: l.name,
            })
            .collect();

        debug!(
            query,
            upstream = total,
            kept = stations.len(),
            "station search complete"
        );

        Ok(stations)
    }

    /// Departures and arrivals at a station within the next
    /// `duration_minutes` (default 10).
    ///
    /// Both sides are fetched concurrently. Any failure, on either side or
    /// while normalizing a single entry, fails the whole board.
    pub async fn get_station_board(
        &self,
        station_id: &str,
        duration_minutes: Option<f64>,
    ) -> Result<BoardResponse, ServiceError> {
        if station_id.trim().is_empty() {
            return Err(ServiceError::invalid_station_id(station_id));
        }

        let duration = duration_minutes.unwrap_or(self.config.default_board_minutes);
        let description = format!("station board for station '{station_id}'");
        let options = BoardOptions {
            products: train_products(),
        };

        let operation = description.as_str();
        let options = &options;
        let fetch = move |kind: BoardKind| async move {
            self.provider
                .schedule(kind, station_id, options)
                .await
                .map_err(|e| ServiceError::from_upstream(operation, e))
        };

        let (departures, arrivals) = try_join(
            fetch(BoardKind::Departures),
            fetch(BoardKind::Arrivals),
        )
        .await?;

        let board = BoardResponse {
            departures: assemble(departures, duration)?,
            arrivals: assemble(arrivals, duration)?,
        };

        debug!(
            station_id,
            duration,
            departures = board.departures.len(),
            arrivals = board.arrivals.len(),
            "station board assembled"
        );

        Ok(board)
    }
}

/// Window one side of a board, then normalize what is left.
fn assemble(events: Vec<Value>, duration_minutes: f64) -> Result<Vec<BoardEntry>, ServiceError> {
    filter_by_duration(events, duration_minutes)
        .iter()
        .map(normalize)
        .collect()
}
