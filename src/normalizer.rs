//! Record normalization
//!
//! This module turns raw parsed rows into canonical records.
//! - Empty cells and nulls are not populated
//! - Syntactically numeric values are coerced to numbers, everything else is kept
//! - Rows with fewer than two populated keys are dropped as noise

use crate::types::{keys, Field, FieldValue, Record};
use serde_json::Value;
use tracing::debug;

/// Minimum number of populated keys for a row to count as a record
pub const MIN_POPULATED_FIELDS: usize = 2;

/// Normalizer for converting raw rows to canonical records
pub struct Normalizer;

impl Normalizer {
    /// Normalize a row of textual key/value pairs (delimited exports)
    pub fn normalize<'a, I>(pairs: I) -> Option<Record>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Record::new();
        for (key, raw) in pairs {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            record.insert(key, Field::measured(coerce_value(raw)));
        }
        Self::accept(record)
    }

    /// Normalize a structured object (JSON exports)
    pub fn normalize_json(value: &Value) -> Option<Record> {
        let Some(object) = value.as_object() else {
            debug!("dropping non-object element");
            return None;
        };

        let mut record = Record::new();
        for (key, raw) in object {
            let value = match raw {
                Value::Null => continue,
                Value::Number(n) => match n.as_f64() {
                    Some(f) => FieldValue::Number(f),
                    None => FieldValue::Other(raw.clone()),
                },
                Value::String(s) => coerce_value(s),
                other => FieldValue::Other(other.clone()),
            };
            record.insert(key.as_str(), Field::measured(value));
        }
        Self::accept(record)
    }

    fn accept(record: Record) -> Option<Record> {
        if record.len() < MIN_POPULATED_FIELDS {
            debug!(populated = record.len(), "dropping sparse row");
            return None;
        }
        check_ranges(&record);
        Some(record)
    }
}

/// Coerce a raw textual value to a number when it is one
pub fn coerce_value(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => FieldValue::Number(n),
        _ => FieldValue::Text(trimmed.to_string()),
    }
}

/// Expected ranges are advisory; out-of-range values are logged, never rejected
fn check_ranges(record: &Record) {
    let checks: [(&str, fn(f64) -> bool); 6] = [
        (keys::HEART_RATE, |v| v > 30.0 && v < 220.0),
        (keys::RESTING_HR, |v| v > 30.0 && v < 220.0),
        (keys::HRV, |v| v > 0.0 && v < 200.0),
        (keys::SLEEP, |v| (0.0..=24.0).contains(&v)),
        (keys::STEPS, |v| v >= 0.0),
        (keys::BLOOD_OXYGEN, |v| v > 70.0 && v <= 100.0),
    ];

    for (key, in_range) in checks {
        if let Some(v) = record.number(key) {
            if !in_range(v) {
                debug!(field = key, value = v, "value outside expected range");
            }
        }
    }

    if let (Some(resting), Some(hr)) = (record.resting_hr(), record.heart_rate()) {
        if resting > hr {
            debug!(resting, hr, "resting heart rate above average heart rate");
        }
    }
}
