use std::sync::Mutex;

use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use super::HearingTestRepository;
use crate::db::DatabaseError;
use crate::models::{HearingTestFilter, HearingTestResult, NewHearingTest};

/// In-memory store for testing.
/// Keeps records in insertion order.
pub struct InMemoryHearingTestStore {
    records: Mutex<Vec<HearingTestResult>>,
}

impl InMemoryHearingTestStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Seed a fully-formed record, keeping its id and timestamp.
    pub fn insert_record(&self, record: HearingTestResult) -> Result<(), DatabaseError> {
        self.records
            .lock()
            .map_err(|_| DatabaseError::LockPoisoned)?
            .push(record);
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl Default for InMemoryHearingTestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HearingTestRepository for InMemoryHearingTestStore {
    fn create(&self, test: &NewHearingTest) -> Result<HearingTestResult, DatabaseError> {
        let record = HearingTestResult::from_new(Uuid::new_v4(), Utc::now().trunc_subsecs(6), test);
        self.insert_record(record.clone())?;
        Ok(record)
    }

    fn get(&self, id: &Uuid) -> Result<Option<HearingTestResult>, DatabaseError> {
        let records = self.records.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(records.iter().find(|r| r.id == *id).cloned())
    }

    fn search(&self, filter: &HearingTestFilter) -> Result<Vec<HearingTestResult>, DatabaseError> {
        let records = self.records.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        // Reverse first so the stable sort leaves later inserts ahead on ties.
        let mut found: Vec<HearingTestResult> = records
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.test_date.cmp(&a.test_date));
        Ok(found)
    }
}
