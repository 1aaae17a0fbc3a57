//! Upstream client error types.

/// Errors from talking to the db-rest upstream.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The requested stop or location does not exist upstream
    #[error("not found upstream")]
    NotFound,

    /// Throttled by the API
    #[error("rate limited by upstream API")]
    RateLimited {
        /// Seconds from the `Retry-After` header, if sent
        retry_after: Option<u64>,
    },

    /// Base URL could not be turned into a request URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Fixture data for the mock provider could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl UpstreamError {
    /// HTTP status reported by the upstream, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Http(e) => e.status().map(|s| s.as_u16()),
            UpstreamError::Api { status, .. } => Some(*status),
            UpstreamError::NotFound => Some(404),
            UpstreamError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Whether the upstream reported the stop as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
