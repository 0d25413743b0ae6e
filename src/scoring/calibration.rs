use serde::{Deserialize, Serialize};

use super::frequency::PerFrequency;

/// Output correction applied by the client for one test tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEntry {
    /// Multiplier applied to the requested volume before playback.
    pub gain_factor: f64,
    /// Loudest level the client may play at this tone.
    pub max_safe_db: f64,
}

/// Process-wide calibration table. Read-only.
pub const CALIBRATION_TABLE: PerFrequency<CalibrationEntry> = PerFrequency {
    hz_500: CalibrationEntry {
        gain_factor: 1.0,
        max_safe_db: 90.0,
    },
    hz_1000: CalibrationEntry {
        gain_factor: 1.0,
        max_safe_db: 90.0,
    },
    hz_2000: CalibrationEntry {
        gain_factor: 0.95,
        max_safe_db: 85.0,
    },
    hz_4000: CalibrationEntry {
        gain_factor: 0.9,
        max_safe_db: 80.0,
    },
    hz_8000: CalibrationEntry {
        gain_factor: 0.85,
        max_safe_db: 75.0,
    },
};

pub fn calibration_table() -> &'static PerFrequency<CalibrationEntry> {
    &CALIBRATION_TABLE
}
