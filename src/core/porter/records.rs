//! Wire records of the porter document
//!
//! Field names are fixed by the interchange format shared with other HealthNet
//! instances. Reference fields hold raw integers whose meaning depends on the
//! direction: store ids before export resolution, document indices in a
//! document, and target ids after import resolution.

use super::dates;
use super::index_map::{EntityKind, IndexMaps, Ref};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A record type stored under one document section
pub trait PorterRecord: Serialize + DeserializeOwned + Send + 'static {
    const KIND: EntityKind;

    /// Translate every reference field through `maps`, exactly once each
    fn remap(&mut self, maps: &IndexMaps);
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<Ref>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Ref>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Non-null ids of a reference list
pub fn present(references: &[Ref]) -> impl Iterator<Item = i64> + '_ {
    references.iter().flatten().copied()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub name: String,
    pub addr: String,
}

impl PorterRecord for HospitalRecord {
    const KIND: EntityKind = EntityKind::Hospitals;

    fn remap(&mut self, _maps: &IndexMaps) {}
}

/// Account fields shared by every user role; absent strings read as empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonFields {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    #[serde(with = "dates::optional_date", default)]
    pub dob: Option<NaiveDate>,
    pub addr: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRecord {
    #[serde(flatten)]
    pub person: PersonFields,
    pub primary_hospital_id: Ref,
    #[serde(default, deserialize_with = "nullable_list")]
    pub hospital_ids: Vec<Ref>,
}

impl PorterRecord for AdminRecord {
    const KIND: EntityKind = EntityKind::Admins;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_in_place(EntityKind::Hospitals, &mut self.primary_hospital_id);
        maps.resolve_all(EntityKind::Hospitals, &mut self.hospital_ids);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    #[serde(flatten)]
    pub person: PersonFields,
    #[serde(default, deserialize_with = "nullable_list")]
    pub hospital_ids: Vec<Ref>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub patient_ids: Vec<Ref>,
}

impl PorterRecord for DoctorRecord {
    const KIND: EntityKind = EntityKind::Doctors;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_all(EntityKind::Hospitals, &mut self.hospital_ids);
        maps.resolve_all(EntityKind::Patients, &mut self.patient_ids);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseRecord {
    #[serde(flatten)]
    pub person: PersonFields,
    pub primary_hospital_id: Ref,
    #[serde(default, deserialize_with = "nullable_list")]
    pub doctor_ids: Vec<Ref>,
}

impl PorterRecord for NurseRecord {
    const KIND: EntityKind = EntityKind::Nurses;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_in_place(EntityKind::Hospitals, &mut self.primary_hospital_id);
        maps.resolve_all(EntityKind::Doctors, &mut self.doctor_ids);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(flatten)]
    pub person: PersonFields,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub eye_color: String,
    #[serde(default)]
    pub bloodtype: String,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub primary_hospital_id: Ref,
    pub primary_doctor_id: Ref,
    #[serde(default, deserialize_with = "nullable_list")]
    pub doctor_ids: Vec<Ref>,
}

impl PorterRecord for PatientRecord {
    const KIND: EntityKind = EntityKind::Patients;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_in_place(EntityKind::Hospitals, &mut self.primary_hospital_id);
        maps.resolve_in_place(EntityKind::Doctors, &mut self.primary_doctor_id);
        maps.resolve_all(EntityKind::Doctors, &mut self.doctor_ids);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    #[serde(with = "dates::timestamp")]
    pub start: DateTime<Utc>,
    #[serde(with = "dates::timestamp")]
    pub end: DateTime<Utc>,
    pub location: String,
    pub description: String,
    #[serde(default, deserialize_with = "nullable_list")]
    pub doctor_ids: Vec<Ref>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub nurse_ids: Vec<Ref>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub patient_ids: Vec<Ref>,
}

impl AppointmentRecord {
    /// Every non-null attendee reference: doctors, then nurses, then patients
    pub fn attendee_refs(&self) -> impl Iterator<Item = i64> + '_ {
        present(&self.doctor_ids)
            .chain(present(&self.nurse_ids))
            .chain(present(&self.patient_ids))
    }
}

impl PorterRecord for AppointmentRecord {
    const KIND: EntityKind = EntityKind::Appointments;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_all(EntityKind::Doctors, &mut self.doctor_ids);
        maps.resolve_all(EntityKind::Nurses, &mut self.nurse_ids);
        maps.resolve_all(EntityKind::Patients, &mut self.patient_ids);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub name: String,
    pub dosage: i32,
    pub notes: String,
    pub doctor_id: Ref,
    pub patient_id: Ref,
}

impl PorterRecord for PrescriptionRecord {
    const KIND: EntityKind = EntityKind::Prescriptions;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_in_place(EntityKind::Doctors, &mut self.doctor_id);
        maps.resolve_in_place(EntityKind::Patients, &mut self.patient_id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    #[serde(with = "dates::date")]
    pub date: NaiveDate,
    pub description: String,
    pub results: String,
    pub released: bool,
    pub doctor_id: Ref,
    pub patient_id: Ref,
}

impl PorterRecord for TestRecord {
    const KIND: EntityKind = EntityKind::Tests;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_in_place(EntityKind::Doctors, &mut self.doctor_id);
        maps.resolve_in_place(EntityKind::Patients, &mut self.patient_id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryRecord {
    /// Carried through unresolved
    pub user_id: Ref,
    pub request_method: String,
    pub request_secure: bool,
    pub request_addr: String,
    pub description: String,
    pub hospital_id: Ref,
}

impl PorterRecord for LogEntryRecord {
    const KIND: EntityKind = EntityKind::LogEntries;

    fn remap(&mut self, maps: &IndexMaps) {
        maps.resolve_in_place(EntityKind::Hospitals, &mut self.hospital_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_json() -> serde_json::Value {
        json!({
            "username": "jdoe",
            "password_hash": "pbkdf2$1",
            "first_name": "Jane",
            "middle_name": "",
            "last_name": "Doe",
            "dob": "1980-02-29",
            "addr": "1 Main St",
            "email": "jane@example.com",
            "phone": "555-0100"
        })
    }

    #[test]
    fn test_patient_record_decodes_flattened_person() {
        let mut value = person_json();
        let extra = json!({
            "emergency_contact": "John 555-0101",
            "eye_color": "brown",
            "bloodtype": "A+",
            "height": 65,
            "weight": null,
            "primary_hospital_id": 0,
            "primary_doctor_id": null,
            "doctor_ids": [1, null]
        });
        value.as_object_mut().unwrap().extend(extra.as_object().unwrap().clone());

        let record: PatientRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.person.username, "jdoe");
        assert_eq!(record.person.dob, NaiveDate::from_ymd_opt(1980, 2, 29));
        assert_eq!(record.height, Some(65));
        assert_eq!(record.weight, None);
        assert_eq!(record.doctor_ids, vec![Some(1), None]);
    }

    #[test]
    fn test_bad_dob_fails_decoding() {
        let mut value = person_json();
        value["dob"] = json!("sometime in spring");
        value["primary_hospital_id"] = json!(null);
        value["hospital_ids"] = json!([]);

        let err = serde_json::from_value::<AdminRecord>(value).unwrap_err();
        assert!(err.to_string().contains("sometime in spring"));
    }

    #[test]
    fn test_null_list_decodes_as_empty() {
        let record: AppointmentRecord = serde_json::from_value(json!({
            "start": "2024-03-01T10:00:00",
            "end": "2024-03-01T11:00:00.000000+00:00",
            "location": "",
            "description": "Checkup",
            "doctor_ids": [3],
            "nurse_ids": null,
            "patient_ids": [4]
        }))
        .unwrap();
        assert!(record.nurse_ids.is_empty());
        assert_eq!(record.attendee_refs().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_appointment_remap_uses_nurse_map() {
        let mut maps = IndexMaps::new();
        maps.insert(EntityKind::Nurses, 0, 70);
        maps.insert(EntityKind::Doctors, 0, 50);

        let mut record: AppointmentRecord = serde_json::from_value(json!({
            "start": "2024-03-01T10:00:00",
            "end": "2024-03-01T11:00:00",
            "location": "",
            "description": "",
            "doctor_ids": [0],
            "nurse_ids": [0],
            "patient_ids": [0]
        }))
        .unwrap();
        record.remap(&maps);

        assert_eq!(record.doctor_ids, vec![Some(50)]);
        assert_eq!(record.nurse_ids, vec![Some(70)]);
        assert_eq!(record.patient_ids, vec![Some(0)]);
    }

    #[test]
    fn test_log_entry_user_id_not_remapped() {
        let mut maps = IndexMaps::new();
        maps.insert(EntityKind::Hospitals, 9, 0);
        let mut record = LogEntryRecord {
            user_id: Some(9),
            request_method: "GET".to_string(),
            request_secure: true,
            request_addr: "127.0.0.1".to_string(),
            description: "login".to_string(),
            hospital_id: Some(9),
        };
        record.remap(&maps);
        assert_eq!(record.user_id, Some(9));
        assert_eq!(record.hospital_id, Some(0));
    }
}
