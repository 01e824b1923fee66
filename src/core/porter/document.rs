//! The porter document
//!
//! [`PorterDocument`] is the typed form written by the exporter.
//! [`RawDocument`] keeps each section as untyped JSON so the importer can
//! decode records one at a time and skip the ones that don't fit.

use super::index_map::EntityKind;
use super::records::{
    AdminRecord, AppointmentRecord, DoctorRecord, HospitalRecord, LogEntryRecord, NurseRecord,
    PatientRecord, PrescriptionRecord, TestRecord,
};
use crate::domain::{HealthNetError, PorterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A complete interchange document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PorterDocument {
    #[serde(default)]
    pub hospitals: Vec<HospitalRecord>,
    #[serde(default)]
    pub admins: Vec<AdminRecord>,
    #[serde(default)]
    pub doctors: Vec<DoctorRecord>,
    #[serde(default)]
    pub nurses: Vec<NurseRecord>,
    #[serde(default)]
    pub patients: Vec<PatientRecord>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
    #[serde(default)]
    pub tests: Vec<TestRecord>,
    #[serde(default)]
    pub prescriptions: Vec<PrescriptionRecord>,
    #[serde(default)]
    pub log_entries: Vec<LogEntryRecord>,
}

impl PorterDocument {
    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Hospitals => self.hospitals.len(),
            EntityKind::Admins => self.admins.len(),
            EntityKind::Doctors => self.doctors.len(),
            EntityKind::Nurses => self.nurses.len(),
            EntityKind::Patients => self.patients.len(),
            EntityKind::Appointments => self.appointments.len(),
            EntityKind::Tests => self.tests.len(),
            EntityKind::Prescriptions => self.prescriptions.len(),
            EntityKind::LogEntries => self.log_entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::IMPORT_ORDER
            .into_iter()
            .all(|kind| self.len(kind) == 0)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A parsed document whose records have not been decoded yet
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    sections: Map<String, Value>,
}

impl RawDocument {
    /// Parse a document from JSON text
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error if the text is not JSON or not an
    /// object, and an `InvalidDocument` error if a known section is present
    /// but is not an array.
    pub fn parse(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(sections) = value else {
            return Err(HealthNetError::Serialization(
                "porter document must be a JSON object".to_string(),
            ));
        };

        for kind in EntityKind::IMPORT_ORDER {
            match sections.get(kind.key()) {
                None | Some(Value::Array(_)) | Some(Value::Null) => {}
                Some(_) => {
                    return Err(PorterError::InvalidDocument(format!(
                        "section '{}' must be an array",
                        kind.key()
                    ))
                    .into())
                }
            }
        }
        Ok(Self { sections })
    }

    /// Records of one section; a missing or null section is empty
    pub fn section(&self, kind: EntityKind) -> &[Value] {
        match self.sections.get(kind.key()) {
            Some(Value::Array(records)) => records,
            _ => &[],
        }
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.section(kind).len()
    }
}

impl From<&PorterDocument> for RawDocument {
    fn from(document: &PorterDocument) -> Self {
        match serde_json::to_value(document) {
            Ok(Value::Object(sections)) => Self { sections },
            _ => Self::default(),
        }
    }
}
