//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

/// Query string of the autocomplete endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteQuery {
    /// Search text; a missing value is treated as empty
    pub q: Option<String>,

    /// Maximum number of stations to return, as sent
    pub limit: Option<String>,
}

impl AutocompleteQuery {
    /// The requested result count, if it is a non-negative integer.
    pub fn result_limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
    }
}

/// Query string of the board endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Window in minutes from now. Kept as text so that a non-numeric
    /// value falls back to the default instead of rejecting the request.
    pub minutes: Option<String>,
}

impl BoardQuery {
    /// The requested window, if it is a finite number.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.minutes
            .as_deref()
            .and_then(|m| m.trim().parse::<f64>().ok())
            .filter(|m| m.is_finite())
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Stable machine-readable error code
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(s: &str) -> Option<f64> {
        BoardQuery {
            minutes: Some(s.to_string()),
        }
        .duration_minutes()
    }

    #[test]
    fn parses_minutes() {
        assert_eq!(minutes("15"), Some(15.0));
        assert_eq!(minutes(" 0.5 "), Some(0.5));
        assert_eq!(minutes("-5"), Some(-5.0));
        assert_eq!(BoardQuery::default().duration_minutes(), None);
    }

    #[test]
    fn parses_limit() {
        let limit = |s: &str| {
            AutocompleteQuery {
                q: None,
                limit: Some(s.to_string()),
            }
            .result_limit()
        };
        assert_eq!(limit("10"), Some(10));
        assert_eq!(limit(" 3 "), Some(3));
        assert_eq!(limit("abc"), None);
        assert_eq!(limit("-1"), None);
        assert_eq!(limit("2.5"), None);
        assert_eq!(AutocompleteQuery::default().result_limit(), None);
    }

    #[test]
    fn non_numeric_minutes_fall_back() {
        assert_eq!(minutes("soon"), None);
        assert_eq!(minutes(""), None);
        assert_eq!(minutes("NaN"), None);
        assert_eq!(minutes("inf"), None);
    }
}
