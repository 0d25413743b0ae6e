//! Repository layer: persistence for hearing-test records.
//!
//! `HearingTestRepository` is the only surface the submission and lookup
//! services see. SQL lives in `hearing_test`; `SqliteHearingTestStore`
//! wraps it behind a mutex, `InMemoryHearingTestStore` backs tests.

mod memory;
mod sqlite_store;

use uuid::Uuid;

use super::DatabaseError;
use crate::models::{HearingTestFilter, HearingTestResult, NewHearingTest};

/// Create/read/filter operations over stored hearing tests.
///
/// Records are immutable: there is no update, and deletion is left to
/// out-of-band tooling.
pub trait HearingTestRepository: Send + Sync {
    /// Persist a new test. The store assigns the identifier and timestamp.
    fn create(&self, test: &NewHearingTest) -> Result<HearingTestResult, DatabaseError>;

    fn get(&self, id: &Uuid) -> Result<Option<HearingTestResult>, DatabaseError>;

    /// Matching records, newest `test_date` first.
    fn search(&self, filter: &HearingTestFilter) -> Result<Vec<HearingTestResult>, DatabaseError>;
}

pub use hearing_test::*;
pub use memory::InMemoryHearingTestStore;
pub use sqlite_store::SqliteHearingTestStore;
