//! Hearing-test scoring: threshold extraction, diagnosis, calibration.
//!
//! Everything here is pure and independent of storage and transport.

pub mod calibration;
pub mod diagnosis;
pub mod frequency;
pub mod threshold;

pub use calibration::{calibration_table, CalibrationEntry, CALIBRATION_TABLE};
pub use diagnosis::{classify, mean_deviation, recommendation_for, Diagnosis, NORMATIVE_THRESHOLDS};
pub use frequency::{Frequency, PerFrequency};
pub use threshold::{analyse_trials, ThresholdReport, Trial, WORST_CASE_THRESHOLD};
