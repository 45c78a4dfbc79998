//! Change-log records.
//!
//! Each line of a partition is one JSON object:
//!
//! ```text
//! {"changeTime": "2016-01-01T00:30:00.001059", "before": {"ambientTemp": 77.0}, "after": {"ambientTemp": 79.0}}
//! ```
//!
//! `before` and `after` may be missing or `null`; other keys are ignored.

use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::clock::{parse_instant, TimeParseError};

pub type FieldValue = Value;
pub type FieldMap = Map<String, FieldValue>;

/// One atomic transition of zero or more fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub change_time: OffsetDateTime,
    pub before: FieldMap,
    pub after: FieldMap,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(rename = "changeTime", default)]
    change_time: Option<String>,
    #[serde(default)]
    before: Option<FieldMap>,
    #[serde(default)]
    after: Option<FieldMap>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing changeTime")]
    MissingChangeTime,
    #[error("invalid changeTime: {0}")]
    ChangeTime(#[from] TimeParseError),
}

impl ChangeEvent {
    pub fn new(change_time: OffsetDateTime, before: FieldMap, after: FieldMap) -> Self {
        Self {
            change_time,
            before,
            after,
        }
    }

    /// Decodes one non-blank log line.
    pub fn from_json_line(line: &str) -> Result<Self, DecodeError> {
        let record: WireRecord = serde_json::from_str(line)?;
        let raw_time = record.change_time.ok_or(DecodeError::MissingChangeTime)?;
        let change_time = parse_instant(&raw_time)?;
        Ok(Self {
            change_time,
            before: record.before.unwrap_or_default(),
            after: record.after.unwrap_or_default(),
        })
    }
}

/// Structural equality where numbers compare by numeric value, so `80` and
/// `80.0` are the same reading.
pub fn values_agree(left: &FieldValue, right: &FieldValue) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_agree(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_agree(x, y)))
        }
        _ => left == right,
    }
}
