//! db-rest API request and response DTOs.
//!
//! These mirror the JSON shapes of the db-rest (`v6.db.transport.rest`)
//! endpoints. Upstream omits fields freely, so nearly everything is
//! optional and defaulted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Service-class flags used by the upstream for stations and for filtering
/// boards. Flags missing from a response read as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFlags {
    pub national_express: bool,
    pub national: bool,
    pub regional_express: bool,
    pub regional: bool,
    pub suburban: bool,
    pub bus: bool,
    pub ferry: bool,
    pub subway: bool,
    pub tram: bool,
    pub taxi: bool,
}

impl ProductFlags {
    /// Flags as `(name, enabled)` pairs, in the upstream's parameter names.
    pub fn query_pairs(&self) -> [(&'static str, bool); 10] {
        [
            ("nationalExpress", self.national_express),
            ("national", self.national),
            ("regionalExpress", self.regional_express),
            ("regional", self.regional),
            ("suburban", self.suburban),
            ("bus", self.bus),
            ("ferry", self.ferry),
            ("subway", self.subway),
            ("tram", self.tram),
            ("taxi", self.taxi),
        ]
    }
}

/// Geographic position of a location. Either coordinate may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A result of the `/locations` search.
///
/// Covers stations, stops, addresses and points of interest; `kind`
/// tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// "station", "stop", "location", ...
    #[serde(rename = "type")]
    pub kind: String,

    /// Upstream identifier (absent for plain addresses).
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub location: Option<Coordinates>,

    pub products: Option<ProductFlags>,
}

/// Options for the `/locations` search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    /// Maximum number of results
    pub results: usize,
    pub fuzzy: bool,
    /// Include points of interest
    pub poi: bool,
    pub addresses: bool,
    pub stops: bool,
}

impl LocationOptions {
    /// Query parameters for the request.
    pub fn query_pairs(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("query", query.to_string()),
            ("results", self.results.to_string()),
            ("fuzzy", self.fuzzy.to_string()),
            ("poi", self.poi.to_string()),
            ("addresses", self.addresses.to_string()),
            ("stops", self.stops.to_string()),
        ]
    }
}

/// Which side of a station board to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    Departures,
    Arrivals,
}

impl BoardKind {
    /// Path segment and response key used by the upstream.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardKind::Departures => "departures",
            BoardKind::Arrivals => "arrivals",
        }
    }
}

/// Options for a departures/arrivals request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    /// Which service classes to include
    pub products: ProductFlags,
}

/// Response body of `/stops/{id}/departures` and `/stops/{id}/arrivals`.
///
/// Individual events are kept as untyped JSON; they are decoded one at a
/// time during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub departures: Option<Vec<Value>>,
    pub arrivals: Option<Vec<Value>>,
}

impl ScheduleResponse {
    /// Take the event list for `kind`, if the response carried one.
    pub fn into_events(self, kind: BoardKind) -> Option<Vec<Value>> {
        match kind {
            BoardKind::Departures => self.departures,
            BoardKind::Arrivals => self.arrivals,
        }
    }
}

/// A single departure or arrival as sent by the upstream.
///
/// Only `trip_id` and `planned_when` are reliably present. A field holding a
/// value of the wrong type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    #[serde(deserialize_with = "lenient")]
    pub trip_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub when: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub planned_when: Option<String>,
    /// Delay in seconds, rounded if sent as a fraction
    #[serde(deserialize_with = "lenient_seconds")]
    pub delay: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub direction: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub provenance: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub line: Option<Line>,
    #[serde(deserialize_with = "lenient")]
    pub cancelled: Option<bool>,
}

/// Line information attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Line {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub product_name: Option<String>,
}

/// Decode a field as `T`, or `None` if it has some other shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a whole or fractional number of seconds.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.round() as i64)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_flags_default_missing_to_false() {
        let flags: ProductFlags = serde_json::from_str(r#"{"regional": true}"#).unwrap();
        assert!(flags.regional);
        assert!(!flags.national_express);
        assert!(!flags.bus);
    }

    #[test]
    fn product_flags_ignore_unknown_classes() {
        let flags: ProductFlags =
            serde_json::from_str(r#"{"bus": true, "cableCar": true}"#).unwrap();
        assert!(flags.bus);
    }

    #[test]
    fn location_parses_db_rest_station() {
        let json = r#"{
            "type": "station",
            "id": "8000261",
            "name": "München Hbf",
            "location": {"type": "location", "id": "8000261", "latitude": 48.140364, "longitude": 11.558744},
            "products": {"nationalExpress": true, "national": true, "regionalExpress": true, "regional": true, "suburban": true, "bus": true, "ferry": false, "subway": true, "tram": true, "taxi": false}
        }"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.kind, "station");
        assert_eq!(location.id, "8000261");
        assert!(location.products.unwrap().national_express);
        let coords = location.location.unwrap();
        assert_eq!(coords.latitude, Some(48.140364));
    }

    #[test]
    fn location_without_coordinates_still_parses() {
        let json = r#"[
            {"type": "station", "id": "1", "name": "A", "location": {"type": "location", "id": "1"}},
            {"type": "station", "id": "2", "name": "B", "location": {"latitude": 50.1}}
        ]"#;
        let locations: Vec<Location> = serde_json::from_str(json).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].location, Some(Coordinates::default()));
        assert_eq!(locations[1].location.unwrap().longitude, None);
    }

    #[test]
    fn address_location_without_id() {
        let json = r#"{"type": "location", "address": "Berlin, Alexanderplatz 1", "latitude": 52.5, "longitude": 13.4}"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.kind, "location");
        assert!(location.id.is_empty());
        assert!(location.products.is_none());
    }

    #[test]
    fn location_options_query() {
        let opts = LocationOptions {
            results: 5,
            fuzzy: true,
            poi: false,
            addresses: false,
            stops: true,
        };
        let pairs = opts.query_pairs("Köln");
        assert_eq!(pairs[0], ("query", "Köln".to_string()));
        assert!(pairs.contains(&("results", "5".to_string())));
        assert!(pairs.contains(&("poi", "false".to_string())));
        assert!(pairs.contains(&("stops", "true".to_string())));
    }

    #[test]
    fn schedule_response_picks_side() {
        let json = r#"{"departures": [{"tripId": "d1"}], "realtimeDataUpdatedAt": 1700000000}"#;
        let resp: ScheduleResponse = serde_json::from_str(json).unwrap();
        assert!(resp.clone().into_events(BoardKind::Arrivals).is_none());
        assert_eq!(resp.into_events(BoardKind::Departures).unwrap().len(), 1);
    }

    #[test]
    fn raw_event_tolerates_nulls() {
        let json = r#"{"tripId": "t1", "when": null, "plannedWhen": "2024-01-01T10:00:00+01:00", "delay": null, "line": {"name": null}}"#;
        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.trip_id.as_deref(), Some("t1"));
        assert!(event.when.is_none());
        assert!(event.line.unwrap().name.is_none());
    }

    #[test]
    fn raw_event_reads_mistyped_fields_as_absent() {
        let json = r#"{"tripId": 7, "when": 12, "delay": "late", "platform": {"no": 1}, "line": "ICE 1", "cancelled": "yes"}"#;
        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, RawEvent::default());

        let event: RawEvent =
            serde_json::from_str(r#"{"line": {"name": 597, "productName": "ICE"}}"#).unwrap();
        let line = event.line.unwrap();
        assert!(line.name.is_none());
        assert_eq!(line.product_name.as_deref(), Some("ICE"));
    }

    #[test]
    fn raw_event_delay_accepts_fractions() {
        let event: RawEvent = serde_json::from_str(r#"{"delay": 60.0}"#).unwrap();
        assert_eq!(event.delay, Some(60));
        let event: RawEvent = serde_json::from_str(r#"{"delay": 89.6}"#).unwrap();
        assert_eq!(event.delay, Some(90));
        let event: RawEvent = serde_json::from_str(r#"{"delay": -30}"#).unwrap();
        assert_eq!(event.delay, Some(-30));
    }
}
