//! Core types for the CardioVision pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: canonical records with per-field provenance, history entries, and
//! the analysis result handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Canonical record keys
pub mod keys {
    pub const DATE: &str = "date";
    pub const HEART_RATE: &str = "heartRate";
    pub const RESTING_HR: &str = "restingHR";
    pub const HRV: &str = "hrv";
    pub const SLEEP: &str = "sleep";
    pub const STEPS: &str = "steps";
    pub const BLOOD_OXYGEN: &str = "bloodOxygen";
}

/// Whether a value was read from the input or generated as a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Measured,
    Synthesized,
}

/// A field value after coercion
///
/// Values that do not parse as numbers are kept as text rather than rejected,
/// so heterogeneous exports survive normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// Non-scalar structured value, preserved as-is
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// A populated record field together with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub value: FieldValue,
    pub provenance: Provenance,
}

impl Field {
    pub fn measured(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            provenance: Provenance::Measured,
        }
    }

    pub fn synthesized(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            provenance: Provenance::Synthesized,
        }
    }
}

/// One observation period, typically a calendar day
///
/// Keys are whatever the export provided; the canonical ones are listed in
/// [`keys`]. Expected to be treated as immutable once produced by an adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: BTreeMap<String, Field>,
    /// Originating file name, set when records from several uploads are merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, field: Field) {
        self.fields.insert(key.into(), field);
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// Numeric value of a field, if present and numeric
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|f| f.value.as_f64())
    }

    pub fn provenance(&self, key: &str) -> Option<Provenance> {
        self.get(key).map(|f| f.provenance)
    }

    pub fn date(&self) -> Option<&str> {
        self.get(keys::DATE).and_then(|f| f.value.as_str())
    }

    pub fn heart_rate(&self) -> Option<f64> {
        self.number(keys::HEART_RATE)
    }

    pub fn resting_hr(&self) -> Option<f64> {
        self.number(keys::RESTING_HR)
    }

    pub fn hrv(&self) -> Option<f64> {
        self.number(keys::HRV)
    }

    pub fn sleep(&self) -> Option<f64> {
        self.number(keys::SLEEP)
    }

    pub fn steps(&self) -> Option<f64> {
        self.number(keys::STEPS)
    }

    pub fn blood_oxygen(&self) -> Option<f64> {
        self.number(keys::BLOOD_OXYGEN)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Tag the record with the file it came from
    pub fn with_source(mut self, filename: impl Into<String>) -> Self {
        self.source = Some(filename.into());
        self
    }
}

/// Provenance summary for a whole upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Every field was read from the file
    Measured,
    /// Measured fields mixed with synthesized backfill
    Augmented,
    /// Every field was generated
    Synthesized,
}

impl DataOrigin {
    pub fn from_records(records: &[Record]) -> Self {
        let mut measured = 0usize;
        let mut synthesized = 0usize;
        for field in records.iter().flat_map(|r| r.fields.values()) {
            match field.provenance {
                Provenance::Measured => measured += 1,
                Provenance::Synthesized => synthesized += 1,
            }
        }

        match (measured, synthesized) {
            (_, 0) => DataOrigin::Measured,
            (0, _) => DataOrigin::Synthesized,
            _ => DataOrigin::Augmented,
        }
    }
}

/// One past ingestion held by the history store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEntry {
    /// Time-ordered identifier (UUID v7)
    pub id: Uuid,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    /// Upper-cased file extension, e.g. "CSV"
    pub file_type: String,
    pub origin: DataOrigin,
    pub records: Vec<Record>,
}

impl HistoricalEntry {
    pub fn new(filename: impl Into<String>, records: Vec<Record>) -> Self {
        let filename = filename.into();
        let file_type = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_uppercase())
            .unwrap_or_default();
        let upload_date = Utc::now();

        Self {
            id: Uuid::now_v7(),
            origin: DataOrigin::from_records(&records),
            filename,
            upload_date,
            file_type,
            records,
        }
    }
}

/// Categorical output of the scoring engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Normal,
    Monitor,
    Urgent,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score <= 1.0 {
            RiskLevel::Normal
        } else if score <= 3.0 {
            RiskLevel::Monitor
        } else {
            RiskLevel::Urgent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Normal => "Normal",
            RiskLevel::Monitor => "Monitor",
            RiskLevel::Urgent => "Urgent",
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            RiskLevel::Normal => ColorTag::Green,
            RiskLevel::Monitor => ColorTag::Yellow,
            RiskLevel::Urgent => ColorTag::Red,
        }
    }

    pub fn recommendation(&self, model_name: &str) -> String {
        match self {
            RiskLevel::Normal => format!(
                "{model_name} analysis indicates good cardiovascular health. Continue your healthy lifestyle!"
            ),
            RiskLevel::Monitor => format!(
                "{model_name} suggests monitoring some indicators more closely. Consider a checkup with your cardiologist."
            ),
            RiskLevel::Urgent => format!(
                "{model_name} has detected multiple risk factors. Please consult with a healthcare professional promptly."
            ),
        }
    }
}

/// Display color for a risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Yellow,
    Red,
}

/// Aggregate metrics over a record sequence
///
/// A metric is `None` when no record carries a numeric value for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub avg_heart_rate: Option<i64>,
    #[serde(rename = "avgRestingHR")]
    pub avg_resting_hr: Option<i64>,
    #[serde(rename = "avgHRV")]
    pub avg_hrv: Option<i64>,
    /// Hours, one decimal
    pub avg_sleep: Option<f64>,
    pub avg_steps: Option<i64>,
}

/// Result of one scoring invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub color: ColorTag,
    pub factors: Vec<String>,
    pub potential_concerns: Vec<String>,
    pub model_used: String,
    pub model_accuracy: String,
    pub metrics: HealthMetrics,
    /// Unrounded mean heart rate, if any record has one
    pub average_bpm: Option<f64>,
}
