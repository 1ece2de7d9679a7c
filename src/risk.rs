//! Risk scoring
//!
//! This module derives a cardiovascular risk assessment from a record sequence:
//! - Five arithmetic means (heart rate, resting HR, HRV, sleep, steps)
//! - Fixed threshold rules weighted by the model's score multiplier
//! - An unweighted heart-rate spread rule for profiles that enable it
//! - Classification into Normal / Monitor / Urgent

use crate::error::ComputeError;
use crate::models::ModelKind;
use crate::types::{AnalysisResult, HealthMetrics, Record, RiskLevel};
use tracing::info;

/// Heart-rate spread (bpm) above which the rhythm rule fires
pub const RHYTHM_SPREAD_THRESHOLD: f64 = 50.0;

/// Flat points added by the rhythm rule
const RHYTHM_POINTS: f64 = 1.0;

const RHYTHM_CONCERN: &str = "Irregular heart rhythm patterns detected";

#[derive(Debug, Clone, Copy)]
enum Metric {
    HeartRate,
    RestingHr,
    Hrv,
    Sleep,
    Steps,
}

#[derive(Debug, Clone, Copy)]
enum Threshold {
    Above(f64),
    Below(f64),
}

impl Threshold {
    fn is_met(&self, value: f64) -> bool {
        match *self {
            Threshold::Above(limit) => value > limit,
            Threshold::Below(limit) => value < limit,
        }
    }
}

struct RiskRule {
    metric: Metric,
    threshold: Threshold,
    points: f64,
    factor: &'static str,
    concern: Option<&'static str>,
}

/// Evaluated in order; each contributes `points * multiplier`
const RULES: [RiskRule; 5] = [
    RiskRule {
        metric: Metric::RestingHr,
        threshold: Threshold::Above(80.0),
        points: 2.0,
        factor: "Elevated resting heart rate",
        concern: Some("Tachycardia risk"),
    },
    RiskRule {
        metric: Metric::HeartRate,
        threshold: Threshold::Above(90.0),
        points: 1.0,
        factor: "High average heart rate",
        concern: None,
    },
    RiskRule {
        metric: Metric::Hrv,
        threshold: Threshold::Below(25.0),
        points: 2.0,
        factor: "Low heart rate variability",
        concern: Some("Autonomic dysfunction risk"),
    },
    RiskRule {
        metric: Metric::Sleep,
        threshold: Threshold::Below(6.5),
        points: 1.0,
        factor: "Insufficient sleep",
        concern: Some("Sleep-related cardiovascular stress"),
    },
    RiskRule {
        metric: Metric::Steps,
        threshold: Threshold::Below(7000.0),
        points: 1.0,
        factor: "Low daily activity",
        concern: Some("Sedentary lifestyle cardiovascular risk"),
    },
];

/// Means over the records that carry a numeric value for each metric
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Averages {
    pub heart_rate: Option<f64>,
    pub resting_hr: Option<f64>,
    pub hrv: Option<f64>,
    pub sleep: Option<f64>,
    pub steps: Option<f64>,
}

impl Averages {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            heart_rate: mean(records, Record::heart_rate),
            resting_hr: mean(records, Record::resting_hr),
            hrv: mean(records, Record::hrv),
            sleep: mean(records, Record::sleep),
            steps: mean(records, Record::steps),
        }
    }

    fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::RestingHr => self.resting_hr,
            Metric::Hrv => self.hrv,
            Metric::Sleep => self.sleep,
            Metric::Steps => self.steps,
        }
    }

    fn to_metrics(self) -> HealthMetrics {
        HealthMetrics {
            avg_heart_rate: self.heart_rate.map(round_whole),
            avg_resting_hr: self.resting_hr.map(round_whole),
            avg_hrv: self.hrv.map(round_whole),
            avg_sleep: self.sleep.map(|v| (v * 10.0).round() / 10.0),
            avg_steps: self.steps.map(round_whole),
        }
    }
}

/// Rule-based risk scoring engine
pub struct RiskEngine;

impl RiskEngine {
    /// Score a record sequence with the given model profile
    ///
    /// Fails with [`ComputeError::EmptyInput`] when there is nothing to score.
    pub fn analyze(records: &[Record], model: ModelKind) -> Result<AnalysisResult, ComputeError> {
        if records.is_empty() {
            return Err(ComputeError::EmptyInput);
        }

        let profile = model.profile();
        let averages = Averages::from_records(records);

        let mut risk_score = 0.0;
        let mut factors = Vec::new();
        let mut potential_concerns = Vec::new();

        for rule in &RULES {
            let fired = averages
                .get(rule.metric)
                .is_some_and(|value| rule.threshold.is_met(value));
            if !fired {
                continue;
            }
            risk_score += rule.points * profile.score_multiplier;
            factors.push(rule.factor.to_string());
            if let Some(concern) = rule.concern {
                potential_concerns.push(concern.to_string());
            }
        }

        if profile.rhythm_rule {
            if let Some(spread) = heart_rate_spread(records) {
                if spread > RHYTHM_SPREAD_THRESHOLD {
                    potential_concerns.push(RHYTHM_CONCERN.to_string());
                    risk_score += RHYTHM_POINTS;
                }
            }
        }

        let risk_level = RiskLevel::from_score(risk_score);

        info!(
            model = profile.key,
            records = records.len(),
            risk_score,
            risk_level = risk_level.as_str(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            risk_score,
            risk_level,
            recommendation: risk_level.recommendation(profile.display_name),
            color: risk_level.color(),
            factors,
            potential_concerns,
            model_used: profile.display_name.to_string(),
            model_accuracy: profile.accuracy_label.to_string(),
            metrics: averages.to_metrics(),
            average_bpm: averages.heart_rate,
        })
    }

    /// Score with a model looked up by catalog key
    pub fn analyze_key(records: &[Record], model_key: &str) -> Result<AnalysisResult, ComputeError> {
        let model = ModelKind::from_key(model_key)?;
        Self::analyze(records, model)
    }
}

/// Max minus min heart rate across the sequence
pub fn heart_rate_spread(records: &[Record]) -> Option<f64> {
    let mut values = records.iter().filter_map(Record::heart_rate);
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some(max - min)
}

fn mean(records: &[Record], value: fn(&Record) -> Option<f64>) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter_map(value)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn round_whole(value: f64) -> i64 {
    value.round() as i64
}
