//! Hearing-test submission and lookup.
//!
//! Glues the pure scoring functions to a `HearingTestRepository`. Every
//! operation returns a `Result`; the HTTP layer decides how errors are
//! rendered.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::{DatabaseError, HearingTestRepository};
use crate::models::{
    Gender, HearingTestFilter, HearingTestResult, NewHearingTest, PatientIdentity,
    DEFAULT_TEST_TYPE,
};
use crate::scoring::{
    analyse_trials, calibration_table, classify, CalibrationEntry, Diagnosis, Frequency,
    PerFrequency, ThresholdReport, Trial, CALIBRATION_TABLE,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ═══════════════════════════════════════════
// Request / response types
// ═══════════════════════════════════════════

/// Body of a test submission.
///
/// `data` stays untyped so that a non-list payload is reported as an
/// invalid format instead of failing deserialisation.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    #[serde(default = "empty_list")]
    pub data: Value,
    #[serde(default)]
    pub patient: Option<PatientPayload>,
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// Patient block as sent by the client form. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl PatientPayload {
    pub fn into_identity(self) -> Result<PatientIdentity, SubmitError> {
        let gender = non_empty(self.gender)
            .map(|g| Gender::from_str(&g))
            .transpose()
            .map_err(|_| SubmitError::InvalidPatient("gender must be \"M\" or \"F\"".into()))?;
        let birth_date = non_empty(self.birth_date)
            .map(|d| parse_date(&d))
            .transpose()
            .map_err(|_| {
                SubmitError::InvalidPatient("invalid birth date format (expected YYYY-MM-DD)".into())
            })?;

        Ok(PatientIdentity {
            last_name: self.last_name.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            middle_name: self.middle_name.unwrap_or_default(),
            gender,
            birth_date,
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        })
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub thresholds: PerFrequency<f64>,
    pub reliability: PerFrequency<f64>,
    pub tested_frequencies: Vec<&'static str>,
    pub diagnosis: String,
    pub recommendations: String,
    pub test_id: Uuid,
}

/// Thresholds and verdict for one set of trials, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTest {
    pub report: ThresholdReport,
    pub diagnosis: Diagnosis,
}

/// Query string of the patient search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientSearchQuery {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub birth_date: Option<String>,
}

impl PatientSearchQuery {
    /// Empty parameters count as absent.
    pub fn into_filter(self) -> Result<HearingTestFilter, LookupError> {
        let birth_date = non_empty(self.birth_date)
            .map(|d| {
                parse_date(&d).map_err(|_| {
                    LookupError::InvalidQuery(format!(
                        "invalid birth_date {d} (expected YYYY-MM-DD)"
                    ))
                })
            })
            .transpose()?;
        Ok(HearingTestFilter {
            last_name: non_empty(self.last_name),
            first_name: non_empty(self.first_name),
            birth_date,
        })
    }
}

/// Calibration table as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationSnapshot {
    pub calibration: &'static PerFrequency<CalibrationEntry>,
    pub timestamp: DateTime<Utc>,
}

// ═══════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Invalid data format")]
    InvalidFormat,
    #[error("Invalid data format: entry {index} is not an object")]
    InvalidTrial { index: usize },
    #[error("Invalid patient data: {0}")]
    InvalidPatient(String),
    #[error("{0}")]
    Storage(#[from] DatabaseError),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Test not found")]
    NotFound,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("{0}")]
    Storage(#[from] DatabaseError),
}

// ═══════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════

/// Decode the `data` array into trials. Elements must be objects; their
/// fields are read leniently.
pub fn parse_trials(data: &Value) -> Result<Vec<Trial>, SubmitError> {
    let entries = data.as_array().ok_or(SubmitError::InvalidFormat)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Trial::from_json(entry).ok_or(SubmitError::InvalidTrial { index }))
        .collect()
}

pub fn score_trials(trials: &[Trial]) -> ScoredTest {
    let report = analyse_trials(trials);
    let diagnosis = classify(&report.thresholds);
    ScoredTest { report, diagnosis }
}

/// Score a submission and persist it. Nothing is stored unless the whole
/// request is valid.
pub fn submit_test(
    repo: &dyn HearingTestRepository,
    request: SubmitRequest,
) -> Result<SubmitOutcome, SubmitError> {
    let trials = parse_trials(&request.data)?;
    let patient = request.patient.unwrap_or_default().into_identity()?;

    let scored = score_trials(&trials);
    let diagnosis = scored.diagnosis.as_str().to_string();
    let recommendations = scored.diagnosis.recommendation().to_string();

    let record = repo.create(&NewHearingTest {
        patient,
        test_type: DEFAULT_TEST_TYPE.to_string(),
        thresholds: scored.report.thresholds,
        reliability: Some(scored.report.reliability),
        calibration: Some(CALIBRATION_TABLE),
        diagnosis: diagnosis.clone(),
        recommendations: recommendations.clone(),
    })?;

    tracing::info!(
        test_id = %record.id,
        trials = trials.len(),
        diagnosis = ?scored.diagnosis,
        "Hearing test saved"
    );

    Ok(SubmitOutcome {
        thresholds: scored.report.thresholds,
        reliability: scored.report.reliability,
        tested_frequencies: Frequency::ALL.iter().map(Frequency::label).collect(),
        diagnosis,
        recommendations,
        test_id: record.id,
    })
}

/// Fetch one record. Identifiers that are not UUIDs cannot exist and are
/// reported as not found.
pub fn get_result(
    repo: &dyn HearingTestRepository,
    id: &str,
) -> Result<HearingTestResult, LookupError> {
    let id = Uuid::parse_str(id).map_err(|_| LookupError::NotFound)?;
    repo.get(&id)?.ok_or(LookupError::NotFound)
}

pub fn search_results(
    repo: &dyn HearingTestRepository,
    query: PatientSearchQuery,
) -> Result<Vec<HearingTestResult>, LookupError> {
    let filter = query.into_filter()?;
    let records = repo.search(&filter)?;
    tracing::debug!(matches = records.len(), unfiltered = filter.is_empty(), "Patient search");
    Ok(records)
}

pub fn calibration_snapshot() -> CalibrationSnapshot {
    CalibrationSnapshot {
        calibration: calibration_table(),
        timestamp: Utc::now(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryHearingTestStore, SqliteHearingTestStore};
    use crate::scoring::WORST_CASE_THRESHOLD;
    use serde_json::json;

    fn request(body: Value) -> SubmitRequest {
        serde_json::from_value(body).unwrap()
    }

    fn patient_json() -> Value {
        json!({
            "lastName": "Petrova",
            "firstName": "Elena",
            "middleName": "Sergeevna",
            "gender": "F",
            "birthDate": "1992-11-05",
            "phone": "+7 999 123 45 67",
            "email": "elena@example.com"
        })
    }

    #[test]
    fn submit_scores_and_persists() {
        let store = InMemoryHearingTestStore::new();
        let outcome = submit_test(
            &store,
            request(json!({
                "data": [
                    {"frequency": 500, "volume": 0.05, "heard": true},
                    {"frequency": 500, "volume": 0.2, "heard": false}
                ],
                "patient": patient_json()
            })),
        )
        .unwrap();

        assert_eq!(outcome.thresholds.hz_500, 0.05);
        assert_eq!(outcome.thresholds.hz_1000, WORST_CASE_THRESHOLD);
        assert_eq!(outcome.thresholds.hz_8000, WORST_CASE_THRESHOLD);
        assert_eq!(outcome.reliability.hz_500, 0.5);
        assert_eq!(outcome.diagnosis, Diagnosis::Referral.as_str());
        assert_eq!(outcome.recommendations, Diagnosis::Referral.recommendation());
        assert_eq!(outcome.tested_frequencies, vec!["500", "1000", "2000", "4000", "8000"]);

        let stored = store.get(&outcome.test_id).unwrap().unwrap();
        assert_eq!(stored.patient_last_name, "Petrova");
        assert_eq!(stored.patient_gender, Some(Gender::Female));
        assert_eq!(stored.patient_birth_date, NaiveDate::from_ymd_opt(1992, 11, 5));
        assert_eq!(stored.test_type, DEFAULT_TEST_TYPE);
        assert_eq!(stored.threshold_500, 0.05);
        assert_eq!(stored.reliability_500, Some(0.5));
        assert_eq!(stored.calibration, Some(CALIBRATION_TABLE));
        assert_eq!(stored.diagnosis, outcome.diagnosis);
    }

    #[test]
    fn non_list_data_is_rejected_without_persisting() {
        let store = InMemoryHearingTestStore::new();
        for data in [json!({"frequency": 500}), json!("abc"), json!(5), Value::Null] {
            let err = submit_test(&store, request(json!({ "data": data }))).unwrap_err();
            assert!(matches!(err, SubmitError::InvalidFormat));
            assert_eq!(err.to_string(), "Invalid data format");
        }
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn missing_data_defaults_to_empty_list() {
        let store = InMemoryHearingTestStore::new();
        let outcome = submit_test(&store, request(json!({}))).unwrap();
        assert!(outcome.thresholds.iter().all(|(_, v)| *v == WORST_CASE_THRESHOLD));
        assert_eq!(outcome.diagnosis, Diagnosis::Referral.as_str());

        let stored = store.get(&outcome.test_id).unwrap().unwrap();
        assert_eq!(stored.patient_last_name, "");
        assert!(stored.patient_gender.is_none());
        assert!(stored.patient_birth_date.is_none());
    }

    #[test]
    fn non_object_trial_is_rejected() {
        let store = InMemoryHearingTestStore::new();
        let err = submit_test(
            &store,
            request(json!({"data": [{"frequency": 500, "volume": 0.1, "heard": true}, 7]})),
        )
        .unwrap_err();
        assert!(matches!(err, SubmitError::InvalidTrial { index: 1 }));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn invalid_patient_fields_are_rejected() {
        let store = InMemoryHearingTestStore::new();
        let bad_gender = submit_test(
            &store,
            request(json!({"data": [], "patient": {"gender": "X"}})),
        )
        .unwrap_err();
        assert!(matches!(bad_gender, SubmitError::InvalidPatient(_)));

        let bad_date = submit_test(
            &store,
            request(json!({"data": [], "patient": {"birthDate": "05.11.1992"}})),
        )
        .unwrap_err();
        assert!(matches!(bad_date, SubmitError::InvalidPatient(_)));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn null_patient_fields_default_to_empty() {
        let identity = serde_json::from_value::<PatientPayload>(json!({
            "lastName": null, "gender": "", "birthDate": ""
        }))
        .unwrap()
        .into_identity()
        .unwrap();
        assert_eq!(identity, PatientIdentity::default());
    }

    #[test]
    fn normal_hearing_is_within_range() {
        let trials: Vec<Trial> = Frequency::ALL
            .iter()
            .map(|f| Trial::new(f64::from(f.hz()), 0.05, true))
            .collect();
        let scored = score_trials(&trials);
        assert_eq!(scored.diagnosis, Diagnosis::Normal);
    }

    #[test]
    fn storage_failure_is_reported() {
        // Sabotage the schema so the insert fails.
        let conn = crate::db::open_memory_database().unwrap();
        conn.execute_batch("DROP TABLE hearing_tests").unwrap();
        let broken = SqliteHearingTestStore::from_connection(conn);

        let err = submit_test(&broken, request(json!({"data": []}))).unwrap_err();
        assert!(matches!(err, SubmitError::Storage(_)));
        assert!(err.to_string().contains("hearing_tests"));
    }

    #[test]
    fn get_result_handles_missing_and_malformed_ids() {
        let store = InMemoryHearingTestStore::new();
        assert!(matches!(
            get_result(&store, &Uuid::new_v4().to_string()),
            Err(LookupError::NotFound)
        ));
        assert!(matches!(get_result(&store, "42"), Err(LookupError::NotFound)));

        let outcome = submit_test(&store, request(json!({"data": []}))).unwrap();
        let record = get_result(&store, &outcome.test_id.to_string()).unwrap();
        assert_eq!(record.id, outcome.test_id);
    }

    #[test]
    fn search_treats_empty_params_as_absent() {
        let store = InMemoryHearingTestStore::new();
        submit_test(&store, request(json!({"data": [], "patient": patient_json()}))).unwrap();
        submit_test(&store, request(json!({"data": [], "patient": {"lastName": "Other"}}))).unwrap();

        let all = search_results(
            &store,
            PatientSearchQuery {
                last_name: Some(String::new()),
                first_name: Some(String::new()),
                birth_date: Some(String::new()),
            },
        )
        .unwrap();
        assert_eq!(all.len(), 2);

        let one = search_results(
            &store,
            PatientSearchQuery {
                last_name: Some("petr".into()),
                first_name: Some("ELENA".into()),
                birth_date: Some("1992-11-05".into()),
            },
        )
        .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].patient_first_name, "Elena");
    }

    #[test]
    fn search_rejects_malformed_birth_date() {
        let store = InMemoryHearingTestStore::new();
        let err = search_results(
            &store,
            PatientSearchQuery {
                birth_date: Some("yesterday".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LookupError::InvalidQuery(_)));
    }

    #[test]
    fn calibration_snapshot_serves_static_table() {
        let snapshot = calibration_snapshot();
        assert_eq!(*snapshot.calibration, CALIBRATION_TABLE);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["calibration"]["4000"]["gain_factor"], 0.9);
        assert!(json["timestamp"].is_string());
    }
}
