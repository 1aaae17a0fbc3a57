//! Time-window filtering of board events.
//!
//! The upstream always answers with its own lookahead window; this narrows
//! a list of events to those between now and `duration_minutes` from now.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::dbrest::RawEvent;

use super::normalize::BoardEntry;

/// Anything carrying an optional RFC 3339 `when` timestamp.
pub trait Timestamped {
    fn when(&self) -> Option<&str>;
}

impl Timestamped for Value {
    fn when(&self) -> Option<&str> {
        self.get("when").and_then(Value::as_str)
    }
}

impl Timestamped for RawEvent {
    fn when(&self) -> Option<&str> {
        self.when.as_deref()
    }
}

impl Timestamped for BoardEntry {
    fn when(&self) -> Option<&str> {
        self.when.as_deref()
    }
}

/// Milliseconds since the epoch, or 0 if `when` is missing or unparseable.
fn timestamp_millis(when: Option<&str>) -> i64 {
    when.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or(0, |t| t.timestamp_millis())
}

/// Keep the entries whose `when` lies in `[now, now + duration_minutes]`.
pub fn filter_by_duration<T: Timestamped>(
    entries: impl IntoIterator<Item = T>,
    duration_minutes: f64,
) -> Vec<T> {
    filter_by_duration_at(entries, duration_minutes, Utc::now())
}

/// [`filter_by_duration`] against an explicit clock.
///
/// Both bounds are inclusive. Entries without a usable timestamp count as
/// the epoch and so never match. Zero, negative and fractional durations are
/// allowed; a NaN duration keeps nothing. Relative order is preserved.
pub fn filter_by_duration_at<T: Timestamped>(
    entries: impl IntoIterator<Item = T>,
    duration_minutes: f64,
    now: DateTime<Utc>,
) -> Vec<T> {
    let now_ms = now.timestamp_millis();
    let cutoff_ms = now_ms as f64 + duration_minutes * 60_000.0;

    entries
        .into_iter()
        .filter(|entry| {
            let when_ms = timestamp_millis(entry.when());
            when_ms >= now_ms && (when_ms as f64) <= cutoff_ms
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
    }

    proptest! {
        #[test]
        fn inclusion_matches_window(offset in -180i64..180, duration in 0i64..120) {
            let when = (now() + Duration::minutes(offset)).to_rfc3339();
            let kept = filter_by_duration_at(vec![json!({"when": when})], duration as f64, now());

            let expected = 0 <= offset && offset <= duration;
            prop_assert_eq!(kept.len() == 1, expected);
        }

        #[test]
        fn missing_when_never_kept(duration in 0.0f64..10_000.0) {
            let kept = filter_by_duration_at(vec![json!({"tripId": "x"})], duration, now());
            prop_assert!(kept.is_empty());
        }

        #[test]
        fn preserves_relative_order(offsets in prop::collection::vec(-30i64..30, 0..20)) {
            let entries: Vec<Value> = offsets
                .iter()
                .enumerate()
                .map(|(i, m)| json!({"i": i, "when": (now() + Duration::minutes(*m)).to_rfc3339()}))
                .collect();

            let kept = filter_by_duration_at(entries, 15.0, now());
            let indices: Vec<u64> = kept.iter().map(|e| e["i"].as_u64().unwrap()).collect();

            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(
                indices.len(),
                offsets.iter().filter(|m| (0..=15).contains(*m)).count()
            );
        }
    }
}
