//! Server configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::board::ServiceConfig;
use crate::dbrest::DbRestConfig;

/// Default listen port.
const DEFAULT_PORT: u16 = 3000;

/// Largest `limit` a client may ask of the autocomplete endpoint.
const DEFAULT_MAX_SEARCH_LIMIT: usize = 50;

/// Error raised for a malformed environment variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: SocketAddr,

    /// Upstream client settings
    pub upstream: DbRestConfig,

    /// Serve fixtures from this directory instead of the live API
    pub mock_dir: Option<PathBuf>,

    /// Station service settings
    pub service: ServiceConfig,

    /// Cap on client-requested search limits
    pub max_search_limit: usize,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// Recognised variables: `BOARD_BIND_ADDR`, `PORT`, `DB_REST_BASE_URL`,
    /// `DB_REST_USER_AGENT`, `DB_REST_TIMEOUT_SECS`, `BOARD_MOCK_DIR`,
    /// `BOARD_MIN_QUERY_LEN`. Unset or blank variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let ip: IpAddr = parse_or(&get, "BOARD_BIND_ADDR", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port: u16 = parse_or(&get, "PORT", DEFAULT_PORT)?;

        let mut upstream = DbRestConfig::new();
        if let Some(url) = get("DB_REST_BASE_URL") {
            upstream = upstream.with_base_url(url);
        }
        if let Some(user_agent) = get("DB_REST_USER_AGENT") {
            upstream = upstream.with_user_agent(user_agent);
        }
        let timeout_secs = parse_or(&get, "DB_REST_TIMEOUT_SECS", upstream.timeout_secs)?;
        upstream = upstream.with_timeout(timeout_secs);

        let service = ServiceConfig::default();
        let min_query_len = parse_or(&get, "BOARD_MIN_QUERY_LEN", service.min_query_len)?;

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            upstream,
            mock_dir: get("BOARD_MOCK_DIR").map(PathBuf::from),
            service: service.with_min_query_len(min_query_len),
            max_search_limit: DEFAULT_MAX_SEARCH_LIMIT,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            upstream: DbRestConfig::default(),
            mock_dir: None,
            service: ServiceConfig::default(),
            max_search_limit: DEFAULT_MAX_SEARCH_LIMIT,
        }
    }
}

/// Parse `var` if set, otherwise use `default`.
fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        let defaults = ServerConfig::default();

        assert_eq!(config.bind_addr, defaults.bind_addr);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.upstream.base_url, defaults.upstream.base_url);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(config.mock_dir.is_none());
        assert_eq!(config.service.min_query_len, 1);
        assert_eq!(config.max_search_limit, 50);
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("BOARD_BIND_ADDR", "0.0.0.0"),
            ("PORT", "8080"),
            ("DB_REST_BASE_URL", "http://localhost:3001"),
            ("DB_REST_USER_AGENT", "my-board"),
            ("DB_REST_TIMEOUT_SECS", "5"),
            ("BOARD_MOCK_DIR", "data/mock"),
            ("BOARD_MIN_QUERY_LEN", "2"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.upstream.base_url, "http://localhost:3001");
        assert_eq!(config.upstream.user_agent, "my-board");
        assert_eq!(config.upstream.timeout_secs, 5);
        assert_eq!(config.mock_dir, Some(PathBuf::from("data/mock")));
        assert_eq!(config.service.min_query_len, 2);
    }

    #[test]
    fn blank_values_use_defaults() {
        let config = config_from(&[("PORT", "  "), ("BOARD_MOCK_DIR", "")]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.mock_dir.is_none());
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.var, "PORT");
        assert_eq!(err.value, "eighty");
        assert!(err.to_string().starts_with("invalid value \"eighty\" for PORT"));

        assert!(config_from(&[("BOARD_MIN_QUERY_LEN", "-1")]).is_err());
        assert!(config_from(&[("BOARD_BIND_ADDR", "localhost")]).is_err());
    }
}
