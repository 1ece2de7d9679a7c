//! Structured object adapter
//!
//! Accepts either an array of record objects or a single object.

use crate::error::ComputeError;
use crate::normalizer::Normalizer;
use crate::types::Record;
use serde_json::Value;

use super::{FormatAdapter, ParseContext};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// JSON export adapter
pub struct JsonAdapter;

impl FormatAdapter for JsonAdapter {
    fn parse(&self, bytes: &[u8], _ctx: &mut ParseContext<'_>) -> Result<Vec<Record>, ComputeError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let payload: Value = serde_json::from_slice(bytes)?;
        let items = match payload {
            Value::Array(items) => items,
            other => vec![other],
        };

        Ok(items.iter().filter_map(Normalizer::normalize_json).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleGenerator;

    fn parse(input: &str) -> Result<Vec<Record>, ComputeError> {
        let mut generator = SampleGenerator::seeded(0);
        let mut ctx = ParseContext {
            synthesize: true,
            sample_days: 30,
            generator: &mut generator,
        };
        JsonAdapter.parse(input.as_bytes(), &mut ctx)
    }

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"date": "2024-01-15", "heartRate": 72, "restingHR": 58, "hrv": 45, "sleep": 7.5, "steps": 8500},
            {"date": "2024-01-16", "heartRate": 75, "restingHR": 60, "hrv": 41, "sleep": 6.8, "steps": 9100},
            {"date": "2024-01-17"},
            "noise"
        ]"#;
        let records = parse(json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].resting_hr(), Some(58.0));
        assert_eq!(records[1].steps(), Some(9100.0));
    }

    #[test]
    fn test_bom_prefixed_json() {
        let records = parse("\u{feff}[{\"date\": \"2024-01-01\", \"heartRate\": 70}]").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].heart_rate(), Some(70.0));
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let records = parse(r#"{"date": "2024-01-15", "heartRate": 72}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date(), Some("2024-01-15"));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse("not valid json").unwrap_err();
        assert!(matches!(err, ComputeError::JsonError(_)));
    }
}
