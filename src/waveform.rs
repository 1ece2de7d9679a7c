//! Illustrative pulse waveform
//!
//! Produces a short P/QRS/T-shaped trace for an average BPM so a consumer can
//! animate a heartbeat. Purely decorative; nothing here feeds the risk score.

use serde::{Deserialize, Serialize};

/// Number of points in a trace
pub const WAVEFORM_POINTS: usize = 50;

/// Samples per second used to lay out a beat
const SAMPLE_RATE_HZ: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavePoint {
    pub x: usize,
    pub y: f64,
}

/// Build a waveform for the given beats per minute
pub fn pulse_waveform(bpm: f64) -> Vec<WavePoint> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Vec::new();
    }

    let beat_ms = 60_000.0 / bpm;
    let samples_per_beat = beat_ms * SAMPLE_RATE_HZ / 1000.0;

    (0..WAVEFORM_POINTS)
        .map(|i| {
            let t = (i as f64 / samples_per_beat) * 2.0 * std::f64::consts::PI;
            let y = if t < 0.5 {
                // P wave
                0.1 * (t * 4.0).sin()
            } else if t < 1.2 {
                // QRS complex
                ((t - 0.5) * 9.0).sin() * 0.8
            } else if t < 2.0 {
                // T wave
                0.3 * ((t - 1.2) * 4.0).sin()
            } else {
                0.0
            };
            WavePoint { x: i, y }
        })
        .collect()
}
