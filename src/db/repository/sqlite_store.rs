use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{SubsecRound, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use super::hearing_test::{get_hearing_test, insert_hearing_test, search_hearing_tests};
use super::HearingTestRepository;
use crate::db::sqlite::{open_database, open_memory_database};
use crate::db::DatabaseError;
use crate::models::{HearingTestFilter, HearingTestResult, NewHearingTest};

/// SQLite-backed store. One connection, serialised by a mutex.
pub struct SqliteHearingTestStore {
    conn: Mutex<Connection>,
}

impl SqliteHearingTestStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    /// Wrap a connection that already has the schema applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl HearingTestRepository for SqliteHearingTestStore {
    fn create(&self, test: &NewHearingTest) -> Result<HearingTestResult, DatabaseError> {
        // Stored timestamps carry microseconds.
        let record = HearingTestResult::from_new(Uuid::new_v4(), Utc::now().trunc_subsecs(6), test);
        let conn = self.lock()?;
        insert_hearing_test(&conn, &record)?;
        tracing::debug!(test_id = %record.id, "Hearing test stored");
        Ok(record)
    }

    fn get(&self, id: &Uuid) -> Result<Option<HearingTestResult>, DatabaseError> {
        let conn = self.lock()?;
        get_hearing_test(&conn, id)
    }

    fn search(&self, filter: &HearingTestFilter) -> Result<Vec<HearingTestResult>, DatabaseError> {
        let conn = self.lock()?;
        search_hearing_tests(&conn, filter)
    }
}
