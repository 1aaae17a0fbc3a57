//! Station service error types.
//!
//! Every failure leaving the board service is a [`ServiceError`]: a kind
//! with a stable code and an HTTP status hint, a human-readable message
//! and, for wrapped failures, the underlying cause.

use std::fmt;

use crate::dbrest::UpstreamError;

/// Boxed underlying cause of a service error.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A known station ID does not exist upstream
    StationNotFound,
    /// A search query failed validation
    InvalidQuery,
    /// A board request had an empty station ID
    InvalidStationId,
    /// An upstream call failed
    ApiConnection,
    /// Upstream data could not be normalized
    DataTransformation,
    /// Upstream signalled throttling
    RateLimit,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::StationNotFound => "STATION_NOT_FOUND",
            ErrorKind::InvalidQuery => "INVALID_QUERY",
            ErrorKind::InvalidStationId => "INVALID_STATION_ID",
            ErrorKind::ApiConnection => "API_CONNECTION_ERROR",
            ErrorKind::DataTransformation => "DATA_TRANSFORMATION_ERROR",
            ErrorKind::RateLimit => "RATE_LIMIT_EXCEEDED",
        }
    }

    /// HTTP status the boundary should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::StationNotFound => 404,
            ErrorKind::InvalidQuery | ErrorKind::InvalidStationId => 400,
            ErrorKind::ApiConnection => 503,
            ErrorKind::DataTransformation => 500,
            ErrorKind::RateLimit => 429,
        }
    }
}

/// A categorized failure from the station service.
#[derive(Debug)]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
    cause: Option<Cause>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

impl ServiceError {
    fn new(kind: ErrorKind, message: String, cause: Option<Cause>) -> Self {
        Self {
            kind,
            message,
            cause,
        }
    }

    pub fn station_not_found(station_id: &str) -> Self {
        Self::new(
            ErrorKind::StationNotFound,
            format!("Station with ID '{station_id}' not found"),
            None,
        )
    }

    /// A query shorter than `min_len` characters.
    pub fn invalid_query(query: &str, min_len: usize) -> Self {
        let rule = if min_len <= 1 {
            "Query must not be empty.".to_string()
        } else {
            format!("Query must be at least {min_len} characters long.")
        };
        Self::new(
            ErrorKind::InvalidQuery,
            format!("Invalid station query: '{query}'. {rule}"),
            None,
        )
    }

    pub fn invalid_station_id(station_id: &str) -> Self {
        Self::new(
            ErrorKind::InvalidStationId,
            format!("Invalid station ID: '{station_id}'. Station ID must not be empty."),
            None,
        )
    }

    /// An upstream failure during `operation`.
    pub fn api_connection(operation: &str, cause: impl Into<Cause>) -> Self {
        Self::new(
            ErrorKind::ApiConnection,
            format!("Failed to connect to transit data API for {operation}"),
            Some(cause.into()),
        )
    }

    /// Unreadable upstream data during `operation`.
    pub fn data_transformation(operation: &str, cause: impl Into<Cause>) -> Self {
        Self::new(
            ErrorKind::DataTransformation,
            format!("Failed to process data for {operation}"),
            Some(cause.into()),
        )
    }

    pub fn rate_limit(retry_after: Option<u64>) -> Self {
        let message = match retry_after {
            Some(secs) => format!("API rate limit exceeded. Retry after {secs} seconds."),
            None => "API rate limit exceeded. Please try again later.".to_string(),
        };
        Self::new(ErrorKind::RateLimit, message, None)
    }

    /// Classify a failed upstream call made for `operation`.
    ///
    /// Throttling keeps its own kind; everything else is a connection error.
    /// A 404 keeps the connection-error kind and only annotates the message.
    pub fn from_upstream(operation: &str, err: UpstreamError) -> Self {
        match err {
            UpstreamError::RateLimited { retry_after } => {
                let mut mapped = Self::rate_limit(retry_after);
                mapped.cause = Some(Box::new(err));
                mapped
            }
            err if err.is_not_found() => {
                Self::api_connection(&format!("{operation} (station not found)"), err)
            }
            err => Self::api_connection(operation, err),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}
