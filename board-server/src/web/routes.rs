//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::board::{BoardResponse, ServiceError, Station};
use crate::dbrest::TransitProvider;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<P: TransitProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations/autocomplete", get(autocomplete_stations::<P>))
        .route("/api/stations/:station_id/board", get(station_board::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search train stations by name.
async fn autocomplete_stations<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Query(req): Query<AutocompleteQuery>,
) -> Result<Json<Vec<Station>>, AppError> {
    let query = req.q.clone().unwrap_or_default();
    let limit = req.result_limit().map(|l| l.min(state.max_search_limit));

    let stations = state.stations.search_stations(&query, limit).await?;

    Ok(Json(stations))
}

/// Departures and arrivals for a station.
async fn station_board<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Path(station_id): Path<String>,
    Query(req): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let board = state
        .stations
        .get_station_board(&station_id, req.duration_minutes())
        .await?;

    Ok(Json(board))
}

/// Application error type.
#[derive(Debug)]
pub struct AppError(ServiceError);

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let cause = err.cause().map(|c| c.to_string()).unwrap_or_default();
        if status.is_server_error() {
            error!(code = err.code(), %status, cause = %cause, "{}", err.message());
        } else {
            warn!(code = err.code(), %status, cause = %cause, "{}", err.message());
        }

        let body = Json(ErrorResponse {
            error: err.message().to_string(),
            code: err.code().to_string(),
        });
        (status, body).into_response()
    }
}
