//! Per-frequency threshold extraction from raw trial responses.

use serde::Serialize;
use serde_json::Value;

use super::frequency::{Frequency, PerFrequency};

/// Threshold assigned when a tone was never heard, or never presented.
/// Equals the loudest volume the client can play.
pub const WORST_CASE_THRESHOLD: f64 = 1.0;

/// A single tone presentation and the listener's answer.
///
/// `frequency` and `volume` stay `None` when the client sent something
/// non-numeric; such trials still count toward reliability but never
/// toward a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub frequency: Option<f64>,
    pub volume: Option<f64>,
    pub heard: bool,
}

impl Trial {
    pub fn new(frequency: f64, volume: f64, heard: bool) -> Self {
        Self {
            frequency: Some(frequency),
            volume: Some(volume),
            heard,
        }
    }

    /// Lenient decode of one element of the client's `data` array.
    /// Returns `None` only when the element is not a JSON object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            frequency: obj.get("frequency").and_then(Value::as_f64),
            volume: obj.get("volume").and_then(Value::as_f64),
            heard: obj.get("heard").and_then(Value::as_bool).unwrap_or(false),
        })
    }

    fn is_at(&self, frequency: Frequency) -> bool {
        self.frequency.is_some_and(|hz| frequency.matches(hz))
    }
}

/// Thresholds plus the reliability ratio computed from the same trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdReport {
    pub thresholds: PerFrequency<f64>,
    pub reliability: PerFrequency<f64>,
}

/// Quietest volume the listener reported hearing at `frequency`.
pub fn threshold_at(trials: &[Trial], frequency: Frequency) -> f64 {
    trials
        .iter()
        .filter(|t| t.is_at(frequency) && t.heard)
        .filter_map(|t| t.volume)
        .fold(None, |min: Option<f64>, v| Some(min.map_or(v, |m| m.min(v))))
        .unwrap_or(WORST_CASE_THRESHOLD)
}

/// Fraction of trials at `frequency` that were heard; 0 when none were run.
pub fn reliability_at(trials: &[Trial], frequency: Frequency) -> f64 {
    let (total, heard) = trials
        .iter()
        .filter(|t| t.is_at(frequency))
        .fold((0usize, 0usize), |(total, heard), t| {
            (total + 1, heard + usize::from(t.heard))
        });
    if total == 0 {
        0.0
    } else {
        heard as f64 / total as f64
    }
}

pub fn extract_thresholds(trials: &[Trial]) -> PerFrequency<f64> {
    PerFrequency::from_fn(|f| threshold_at(trials, f))
}

pub fn extract_reliability(trials: &[Trial]) -> PerFrequency<f64> {
    PerFrequency::from_fn(|f| reliability_at(trials, f))
}

pub fn analyse_trials(trials: &[Trial]) -> ThresholdReport {
    ThresholdReport {
        thresholds: extract_thresholds(trials),
        reliability: extract_reliability(trials),
    }
}
