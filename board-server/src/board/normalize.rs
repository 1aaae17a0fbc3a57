//! Normalization of raw upstream events into board entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dbrest::RawEvent;

use super::error::ServiceError;

/// Operation name attached to normalization failures.
const OPERATION: &str = "board entry mapping";

/// A departure or arrival with every optional field filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntry {
    pub trip_id: Option<String>,
    /// Realtime time, falling back to the planned time
    pub when: Option<String>,
    pub planned_when: Option<String>,
    /// Delay in seconds
    pub delay: i64,
    pub platform: String,
    pub direction: String,
    pub provenance: String,
    /// Line name, e.g. "ICE 597"
    pub line: String,
    pub cancelled: bool,
}

impl From<RawEvent> for BoardEntry {
    fn from(raw: RawEvent) -> Self {
        let when = raw
            .when
            .filter(|w| !w.is_empty())
            .or_else(|| raw.planned_when.clone());

        Self {
            trip_id: raw.trip_id,
            when,
            planned_when: raw.planned_when,
            delay: raw.delay.unwrap_or(0),
            platform: raw.platform.unwrap_or_default(),
            direction: raw.direction.unwrap_or_default(),
            provenance: raw.provenance.unwrap_or_default(),
            line: raw.line.and_then(|l| l.name).unwrap_or_default(),
            cancelled: raw.cancelled.unwrap_or(false),
        }
    }
}

/// Decode one upstream record and fill in defaults.
///
/// Fields of the wrong type are treated as missing. The only failure is a
/// record that is not a JSON object at all.
pub fn normalize(raw: &Value) -> Result<BoardEntry, ServiceError> {
    if !raw.is_object() {
        return Err(ServiceError::data_transformation(
            OPERATION,
            format!("board entry is not an object: {}", json_type(raw)),
        ));
    }
    let event =
        RawEvent::deserialize(raw).map_err(|e| ServiceError::data_transformation(OPERATION, e))?;
    Ok(BoardEntry::from(event))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
