//! Sample record synthesis
//!
//! Generates plausible daily records for demos and as the fallback for exports
//! that cannot be decoded. Every generated field is tagged as synthesized.

use crate::types::{keys, Field, Record};
use chrono::{Days, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Default number of days generated
pub const DEFAULT_SAMPLE_DAYS: usize = 30;

/// Random daily record generator
pub struct SampleGenerator {
    rng: StdRng,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleGenerator {
    /// Create a generator seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `n` consecutive daily records ending today (UTC)
    pub fn generate(&mut self, n: usize) -> Vec<Record> {
        self.generate_ending(n, Utc::now().date_naive())
    }

    /// Generate `n` consecutive daily records ending on `end`
    ///
    /// Days that fall before the earliest representable date are skipped, so
    /// the result can be shorter than `n` for very large requests.
    pub fn generate_ending(&mut self, n: usize, end: NaiveDate) -> Vec<Record> {
        let records: Vec<Record> = (0..n)
            .filter_map(|i| end.checked_sub_days(Days::new((n - 1 - i) as u64)))
            .map(|date| {
                let mut record = Record::new();
                record.insert(keys::DATE, Field::synthesized(date.format("%Y-%m-%d").to_string()));
                self.fill_missing(&mut record);
                record
            })
            .collect();

        if records.len() < n {
            warn!(
                requested = n,
                generated = records.len(),
                "sample range exceeds supported dates; oldest days skipped"
            );
        }
        records
    }

    /// Backfill every canonical metric the record does not already carry
    pub fn fill_missing(&mut self, record: &mut Record) {
        if record.get(keys::HEART_RATE).is_none() {
            record.insert(keys::HEART_RATE, Field::synthesized(self.heart_rate()));
        }
        if record.get(keys::STEPS).is_none() {
            record.insert(keys::STEPS, Field::synthesized(self.steps()));
        }
        if record.get(keys::SLEEP).is_none() {
            record.insert(keys::SLEEP, Field::synthesized(self.sleep()));
        }
        if record.get(keys::RESTING_HR).is_none() {
            record.insert(keys::RESTING_HR, Field::synthesized(self.resting_hr()));
        }
        if record.get(keys::HRV).is_none() {
            record.insert(keys::HRV, Field::synthesized(self.hrv()));
        }
        if record.get(keys::BLOOD_OXYGEN).is_none() {
            record.insert(keys::BLOOD_OXYGEN, Field::synthesized(self.blood_oxygen()));
        }
    }

    fn heart_rate(&mut self) -> f64 {
        self.rng.random_range(60..100) as f64
    }

    fn steps(&mut self) -> f64 {
        self.rng.random_range(5000..10000) as f64
    }

    fn sleep(&mut self) -> f64 {
        self.rng.random_range(6.0..9.0)
    }

    fn resting_hr(&mut self) -> f64 {
        self.rng.random_range(55..75) as f64
    }

    fn hrv(&mut self) -> f64 {
        self.rng.random_range(20..50) as f64
    }

    fn blood_oxygen(&mut self) -> f64 {
        self.rng.random_range(97.0..99.0)
    }
}
