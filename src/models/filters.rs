use chrono::NaiveDate;

use super::hearing_test::HearingTestResult;

/// Patient search. Name filters are case-insensitive substrings; the
/// birth date must match exactly. Unset filters match everything.
#[derive(Debug, Default, Clone)]
pub struct HearingTestFilter {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl HearingTestFilter {
    pub fn is_empty(&self) -> bool {
        self.last_name.is_none() && self.first_name.is_none() && self.birth_date.is_none()
    }

    pub fn matches(&self, record: &HearingTestResult) -> bool {
        contains_ci(&record.patient_last_name, self.last_name.as_deref())
            && contains_ci(&record.patient_first_name, self.first_name.as_deref())
            && self
                .birth_date
                .map_or(true, |d| record.patient_birth_date == Some(d))
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}
