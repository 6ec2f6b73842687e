//! Backup payload codec and validator.
//!
//! The payload is the bare JSON object of the record (`{"1": 3, "2": "X"}`),
//! with no version field or checksum. Untrusted text is parsed into a
//! `serde_json::Value` and structurally checked before it is turned into a
//! [`ScoreRecord`].

use crate::error::{BackupError, ValidationError};
use crate::record::{DayOffset, Outcome, ScoreRecord};
use serde_json::Value;

/// Serialized [`ScoreRecord`], as written to the clipboard or a backup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPayload(String);

impl BackupPayload {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for BackupPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic: days are always written in ascending order.
#[must_use]
pub fn encode(record: &ScoreRecord) -> BackupPayload {
    // A map of integer keys to numbers/strings cannot fail to serialize.
    BackupPayload(serde_json::to_string(record).unwrap_or_else(|_| String::from("{}")))
}

/// Parse and validate untrusted backup text.
///
/// # Errors
///
/// Returns [`BackupError::MalformedJson`] when the text is not JSON and
/// [`BackupError::Invalid`] when it is JSON of the wrong shape.
pub fn decode(text: &str) -> Result<ScoreRecord, BackupError> {
    let value: Value = serde_json::from_str(text).map_err(BackupError::MalformedJson)?;
    Ok(record_from_value(&value)?)
}

/// `true` when `candidate` has the shape of a backup payload.
#[must_use]
pub fn validate(candidate: &Value) -> bool {
    record_from_value(candidate).is_ok()
}

/// Structural check and conversion of an already-parsed value.
///
/// # Errors
///
/// Returns the first structural problem found.
pub fn record_from_value(candidate: &Value) -> Result<ScoreRecord, ValidationError> {
    let Value::Object(entries) = candidate else {
        return Err(ValidationError::NotAnObject {
            found: value_kind(candidate),
        });
    };

    let mut record = ScoreRecord::new();
    for (key, raw) in entries {
        let day = parse_day_key(key).ok_or_else(|| ValidationError::InvalidDay { key: key.clone() })?;
        let outcome: Outcome = serde_json::from_value(raw.clone()).map_err(|_| {
            ValidationError::InvalidOutcome {
                day,
                source: crate::error::OutcomeError(raw.to_string()),
            }
        })?;
        record.insert(day, outcome);
    }
    Ok(record)
}

/// Only canonical positive integers are accepted, so `"01"` and `"1"` can
/// never both name day 1.
fn parse_day_key(key: &str) -> Option<DayOffset> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) || key.starts_with('0') {
        return None;
    }
    key.parse::<DayOffset>().ok()
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
