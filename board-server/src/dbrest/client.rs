//! db-rest HTTP client.
//!
//! Provides async methods for querying a db-rest instance, the REST
//! front-end to Deutsche Bahn's journey planner. Handles status mapping and
//! JSON decoding; board events are returned undecoded.

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::error::UpstreamError;
use super::provider::TransitProvider;
use super::types::{BoardKind, BoardOptions, Location, LocationOptions, ScheduleResponse};

/// Default base URL for the public db-rest instance.
const DEFAULT_BASE_URL: &str = "https://v6.db.transport.rest";

/// Default User-Agent; db-rest asks clients to identify themselves.
const DEFAULT_USER_AGENT: &str = "train-app/1.0.0";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of body characters kept in JSON error reports.
const ERROR_BODY_CHARS: usize = 500;

/// Configuration for the db-rest client.
#[derive(Debug, Clone)]
pub struct DbRestConfig {
    /// Base URL for the API (defaults to the public instance)
    pub base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DbRestConfig {
    /// Create a config pointing at the public instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (self-hosted instance or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DbRestConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// db-rest API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DbRestClient {
    http: reqwest::Client,
    base_url: String,
}

impl DbRestClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DbRestConfig) -> Result<Self, UpstreamError> {
        Url::parse(&config.base_url).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Build an endpoint URL from the base URL and path segments.
    ///
    /// Segments are percent-encoded, so station IDs cannot alter the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        debug!(url = %url, "db-rest request");

        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok());
            return Err(UpstreamError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| UpstreamError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(ERROR_BODY_CHARS).collect()),
        })
    }
}

impl TransitProvider for DbRestClient {
    async fn locations(
        &self,
        query: &str,
        options: &LocationOptions,
    ) -> Result<Vec<Location>, UpstreamError> {
        let url = self.endpoint(&["locations"])?;
        self.get_json(url, &options.query_pairs(query)).await
    }

    async fn schedule(
        &self,
        kind: BoardKind,
        station_id: &str,
        options: &BoardOptions,
    ) -> Result<Vec<Value>, UpstreamError> {
        let url = self.endpoint(&["stops", station_id, kind.as_str()])?;
        let query: Vec<(&str, String)> = options
            .products
            .query_pairs()
            .into_iter()
            .map(|(name, enabled)| (name, enabled.to_string()))
            .collect();

        let response: ScheduleResponse = self.get_json(url, &query).await?;

        response
            .into_events(kind)
            .ok_or_else(|| UpstreamError::Json {
                message: format!("response has no `{}` array", kind.as_str()),
                body: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = DbRestConfig::new()
            .with_base_url("http://localhost:3000")
            .with_user_agent("board-tests")
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.user_agent, "board-tests");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = DbRestConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn client_creation() {
        let client = DbRestClient::new(DbRestConfig::new());
        assert!(client.is_ok());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let client = DbRestClient::new(DbRestConfig::new().with_base_url("not a url"));
        assert!(matches!(client, Err(UpstreamError::InvalidUrl(_))));
    }

    #[test]
    fn endpoint_appends_segments() {
        let client = DbRestClient::new(DbRestConfig::new()).unwrap();
        let url = client
            .endpoint(&["stops", "8000105", "departures"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://v6.db.transport.rest/stops/8000105/departures"
        );
    }

    #[test]
    fn endpoint_handles_trailing_slash_and_prefix() {
        let client =
            DbRestClient::new(DbRestConfig::new().with_base_url("http://localhost:3000/db/"))
                .unwrap();
        let url = client.endpoint(&["locations"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/db/locations");
    }

    #[test]
    fn endpoint_encodes_station_id() {
        let client = DbRestClient::new(DbRestConfig::new()).unwrap();
        let url = client.endpoint(&["stops", "a/b", "arrivals"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://v6.db.transport.rest/stops/a%2Fb/arrivals"
        );
    }

    // Live API tests would need network access to a db-rest instance and
    // belong behind #[ignore].
}
