//! Diagnosis classification from per-frequency thresholds.
//!
//! Thresholds are compared against normative hearing levels expressed in
//! the same proportional loudness units the client plays tones in (0.0 to
//! 1.0). The mean signed deviation is bucketed into four ordered ranges,
//! each lower bound inclusive.

use serde::Serialize;

use super::frequency::PerFrequency;

/// Normative thresholds for a healthy adult listener.
pub const NORMATIVE_THRESHOLDS: PerFrequency<f64> = PerFrequency {
    hz_500: 0.1,
    hz_1000: 0.08,
    hz_2000: 0.05,
    hz_4000: 0.03,
    hz_8000: 0.02,
};

const MILD_LOWER_BOUND: f64 = 0.1;
const MODERATE_LOWER_BOUND: f64 = 0.3;
const REFERRAL_LOWER_BOUND: f64 = 0.6;

/// Diagnosis buckets ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Normal,
    MildLoss,
    ModerateLoss,
    Referral,
}

impl Diagnosis {
    pub fn from_mean_deviation(mean: f64) -> Self {
        if mean < MILD_LOWER_BOUND {
            Self::Normal
        } else if mean < MODERATE_LOWER_BOUND {
            Self::MildLoss
        } else if mean < REFERRAL_LOWER_BOUND {
            Self::ModerateLoss
        } else {
            Self::Referral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Hearing within normal range",
            Self::MildLoss => "Mild hearing loss",
            Self::ModerateLoss => "Moderate hearing loss",
            Self::Referral => "Specialist consultation recommended",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        recommendation_for(self.as_str())
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation text chosen by keyword from a diagnosis text.
///
/// Works on the stored string so that older records, or text edited by
/// hand, still map onto one of the four messages.
pub fn recommendation_for(diagnosis: &str) -> &'static str {
    let text = diagnosis.to_lowercase();
    if text.contains("normal") {
        "No action needed. Repeat the screening in 12 months."
    } else if text.contains("mild") {
        "Limit exposure to loud noise and repeat the test in 6 months."
    } else if text.contains("moderate") {
        "Book a full examination with an audiologist."
    } else {
        "Consult an ENT specialist as soon as possible."
    }
}

/// Mean of `observed - norm` across frequencies, skipping non-finite
/// thresholds. Zero when nothing is left to average.
pub fn mean_deviation(thresholds: &PerFrequency<f64>) -> f64 {
    let deviations: Vec<f64> = thresholds
        .iter()
        .filter(|(_, observed)| observed.is_finite())
        .map(|(f, observed)| observed - NORMATIVE_THRESHOLDS.get(f))
        .collect();
    if deviations.is_empty() {
        return 0.0;
    }
    deviations.iter().sum::<f64>() / deviations.len() as f64
}

pub fn classify(thresholds: &PerFrequency<f64>) -> Diagnosis {
    Diagnosis::from_mean_deviation(mean_deviation(thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::threshold::{extract_thresholds, Trial};
    use proptest::prelude::*;

    #[test]
    fn normative_thresholds_are_normal() {
        assert_eq!(mean_deviation(&NORMATIVE_THRESHOLDS), 0.0);
        assert_eq!(classify(&NORMATIVE_THRESHOLDS), Diagnosis::Normal);
    }

    #[test]
    fn lower_bounds_are_inclusive() {
        assert_eq!(Diagnosis::from_mean_deviation(0.0999), Diagnosis::Normal);
        assert_eq!(Diagnosis::from_mean_deviation(0.1), Diagnosis::MildLoss);
        assert_eq!(Diagnosis::from_mean_deviation(0.2999), Diagnosis::MildLoss);
        assert_eq!(Diagnosis::from_mean_deviation(0.3), Diagnosis::ModerateLoss);
        assert_eq!(Diagnosis::from_mean_deviation(0.5999), Diagnosis::ModerateLoss);
        assert_eq!(Diagnosis::from_mean_deviation(0.6), Diagnosis::Referral);
        assert_eq!(Diagnosis::from_mean_deviation(-1.0), Diagnosis::Normal);
    }

    #[test]
    fn non_finite_thresholds_are_skipped() {
        let mut thresholds = NORMATIVE_THRESHOLDS;
        thresholds.hz_500 = f64::NAN;
        thresholds.hz_8000 = f64::INFINITY;
        assert_eq!(mean_deviation(&thresholds), 0.0);

        let all_nan = PerFrequency::from_fn(|_| f64::NAN);
        assert_eq!(mean_deviation(&all_nan), 0.0);
        assert_eq!(classify(&all_nan), Diagnosis::Normal);
    }

    #[test]
    fn one_heard_tone_and_four_silent_needs_referral() {
        let trials = vec![Trial::new(500.0, 0.05, true), Trial::new(500.0, 0.2, false)];
        let thresholds = extract_thresholds(&trials);
        assert_eq!(thresholds.hz_500, 0.05);
        assert_eq!(thresholds.hz_1000, 1.0);
        assert_eq!(thresholds.hz_8000, 1.0);
        assert_eq!(classify(&thresholds), Diagnosis::Referral);
    }

    #[test]
    fn uniform_shift_lands_in_expected_bucket() {
        let shifted = |delta: f64| PerFrequency::from_fn(|f| NORMATIVE_THRESHOLDS.get(f) + delta);
        assert_eq!(classify(&shifted(0.05)), Diagnosis::Normal);
        assert_eq!(classify(&shifted(0.2)), Diagnosis::MildLoss);
        assert_eq!(classify(&shifted(0.45)), Diagnosis::ModerateLoss);
        assert_eq!(classify(&shifted(0.7)), Diagnosis::Referral);
    }

    #[test]
    fn recommendation_follows_diagnosis_text() {
        assert_eq!(
            recommendation_for("Hearing within NORMAL range"),
            Diagnosis::Normal.recommendation()
        );
        assert_eq!(recommendation_for("mild loss"), Diagnosis::MildLoss.recommendation());
        assert_eq!(
            recommendation_for("Moderate loss"),
            Diagnosis::ModerateLoss.recommendation()
        );
        assert_eq!(recommendation_for("anything else"), Diagnosis::Referral.recommendation());
    }

    #[test]
    fn each_bucket_has_a_distinct_recommendation() {
        let all = [
            Diagnosis::Normal,
            Diagnosis::MildLoss,
            Diagnosis::ModerateLoss,
            Diagnosis::Referral,
        ];
        let recs: std::collections::HashSet<&str> =
            all.iter().map(Diagnosis::recommendation).collect();
        assert_eq!(recs.len(), 4);
    }

    proptest! {
        #[test]
        fn bucketing_is_monotonic(a in -2.0f64..2.0, b in -2.0f64..2.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Diagnosis::from_mean_deviation(lo) <= Diagnosis::from_mean_deviation(hi));
        }

        #[test]
        fn stored_diagnosis_text_maps_back_to_its_recommendation(mean in -2.0f64..2.0) {
            let diagnosis = Diagnosis::from_mean_deviation(mean);
            prop_assert_eq!(recommendation_for(diagnosis.as_str()), diagnosis.recommendation());
        }
    }
}
