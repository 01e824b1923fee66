//! Prescription domain model

use super::ids::{PrescriptionId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A prescription written by a doctor for a patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub patient_id: Option<UserId>,
    pub doctor_id: Option<UserId>,
    pub name: String,
    pub issue_date: NaiveDate,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub refills: i32,
    #[serde(default)]
    pub description: String,
}

impl Prescription {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date < today
    }
}

/// A prescription that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrescription {
    pub patient_id: Option<UserId>,
    pub doctor_id: Option<UserId>,
    pub name: String,
    pub issue_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub refills: i32,
    pub description: String,
}

impl NewPrescription {
    /// Attaches the identifier assigned by the store
    pub fn with_id(self, id: PrescriptionId) -> Prescription {
        Prescription {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            name: self.name,
            issue_date: self.issue_date,
            expiration_date: self.expiration_date,
            refills: self.refills,
            description: self.description,
        }
    }
}
