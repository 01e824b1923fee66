//! Test result domain model

use super::ids::{TestResultId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A medical test ordered by a doctor
///
/// Results stay hidden from the patient until they are released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: TestResultId,
    pub patient_id: Option<UserId>,
    pub doctor_id: Option<UserId>,
    pub test_date: NaiveDate,
    pub test_type: String,
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_released: bool,
}

impl TestResult {
    /// Releases the result to the patient
    ///
    /// Releasing twice keeps the first release date.
    pub fn release(&mut self, today: NaiveDate) {
        if !self.is_released {
            self.is_released = true;
            self.release_date = Some(today);
        }
    }
}

/// A test result that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestResult {
    pub patient_id: Option<UserId>,
    pub doctor_id: Option<UserId>,
    pub test_date: NaiveDate,
    pub test_type: String,
    pub release_date: Option<NaiveDate>,
    pub description: String,
    pub comment: String,
    pub is_released: bool,
}

impl NewTestResult {
    /// Attaches the identifier assigned by the store
    pub fn with_id(self, id: TestResultId) -> TestResult {
        TestResult {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            test_date: self.test_date,
            test_type: self.test_type,
            release_date: self.release_date,
            description: self.description,
            comment: self.comment,
            is_released: self.is_released,
        }
    }
}
