//! Document export
//!
//! [`HealthNetExport`] collects records that still carry real store ids and,
//! when the document is produced, rewrites every reference into the position
//! of the referenced record in the document.

use super::dates::format_date;
use super::document::PorterDocument;
use super::index_map::{EntityKind, IndexMaps, Ref};
use super::records::{
    AdminRecord, AppointmentRecord, DoctorRecord, HospitalRecord, LogEntryRecord, NurseRecord,
    PatientRecord, PersonFields, PorterRecord, PrescriptionRecord, TestRecord,
};
use crate::adapters::store::Dataset;
use crate::domain::{Appointment, LogEntry, Prescription, Result, Role, RoleKind, TestResult, User};

/// Incremental exporter
///
/// Records are emitted in insertion order. Each referenced kind (hospitals and
/// the four user roles) gets zero-based indices in the order its records were
/// added.
#[derive(Debug, Clone, Default)]
pub struct HealthNetExport {
    maps: IndexMaps,
    document: PorterDocument,
}

impl HealthNetExport {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign(&mut self, kind: EntityKind, pk: i64) {
        let index = self.document.len(kind) as i64;
        self.maps.insert(kind, pk, index);
    }

    pub fn add_hospital(&mut self, pk: impl Into<i64>, record: HospitalRecord) -> &mut Self {
        self.assign(EntityKind::Hospitals, pk.into());
        self.document.hospitals.push(record);
        self
    }

    pub fn add_admin(&mut self, pk: impl Into<i64>, record: AdminRecord) -> &mut Self {
        self.assign(EntityKind::Admins, pk.into());
        self.document.admins.push(record);
        self
    }

    pub fn add_doctor(&mut self, pk: impl Into<i64>, record: DoctorRecord) -> &mut Self {
        self.assign(EntityKind::Doctors, pk.into());
        self.document.doctors.push(record);
        self
    }

    pub fn add_nurse(&mut self, pk: impl Into<i64>, record: NurseRecord) -> &mut Self {
        self.assign(EntityKind::Nurses, pk.into());
        self.document.nurses.push(record);
        self
    }

    pub fn add_patient(&mut self, pk: impl Into<i64>, record: PatientRecord) -> &mut Self {
        self.assign(EntityKind::Patients, pk.into());
        self.document.patients.push(record);
        self
    }

    pub fn add_appointment(&mut self, record: AppointmentRecord) -> &mut Self {
        self.document.appointments.push(record);
        self
    }

    pub fn add_prescription(&mut self, record: PrescriptionRecord) -> &mut Self {
        self.document.prescriptions.push(record);
        self
    }

    pub fn add_test(&mut self, record: TestRecord) -> &mut Self {
        self.document.tests.push(record);
        self
    }

    pub fn add_log_entry(&mut self, record: LogEntryRecord) -> &mut Self {
        self.document.log_entries.push(record);
        self
    }

    /// The resolved document
    ///
    /// Added records are left untouched, so this can be called repeatedly.
    pub fn export_document(&self) -> PorterDocument {
        let mut document = self.document.clone();
        remap_all(&mut document.hospitals, &self.maps);
        remap_all(&mut document.admins, &self.maps);
        remap_all(&mut document.doctors, &self.maps);
        remap_all(&mut document.nurses, &self.maps);
        remap_all(&mut document.patients, &self.maps);
        remap_all(&mut document.appointments, &self.maps);
        remap_all(&mut document.tests, &self.maps);
        remap_all(&mut document.prescriptions, &self.maps);
        remap_all(&mut document.log_entries, &self.maps);
        document
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_document().to_json()
    }

    pub fn export_json_pretty(&self) -> Result<String> {
        self.export_document().to_json_pretty()
    }
}

fn remap_all<R: PorterRecord>(records: &mut [R], maps: &IndexMaps) {
    for record in records {
        record.remap(maps);
    }
}

fn raw<T: Into<i64>>(id: Option<T>) -> Ref {
    id.map(Into::into)
}

fn raw_list<T: Into<i64> + Copy>(ids: &[T]) -> Vec<Ref> {
    ids.iter().map(|id| Some((*id).into())).collect()
}

fn person(user: &User) -> PersonFields {
    PersonFields {
        username: user.username.clone(),
        password_hash: user.password_hash.clone(),
        first_name: user.first_name.clone(),
        middle_name: user.middle_name.clone(),
        last_name: user.last_name.clone(),
        dob: user.dob,
        addr: user.address.to_string(),
        email: user.email.clone(),
        phone: user.phone.clone(),
    }
}

fn appointment_record(appointment: &Appointment, dataset: &Dataset) -> AppointmentRecord {
    let attendees_of = |kind: RoleKind| -> Vec<Ref> {
        appointment
            .attendees
            .iter()
            .filter(|id| dataset.user(**id).is_some_and(|user| user.is(kind)))
            .map(|id| Some(id.get()))
            .collect()
    };
    AppointmentRecord {
        start: appointment.start,
        end: appointment.end,
        location: appointment.location.clone(),
        description: appointment.description.clone(),
        doctor_ids: attendees_of(RoleKind::Doctor),
        nurse_ids: attendees_of(RoleKind::Nurse),
        patient_ids: attendees_of(RoleKind::Patient),
    }
}

fn prescription_record(prescription: &Prescription) -> PrescriptionRecord {
    PrescriptionRecord {
        name: prescription.name.clone(),
        dosage: prescription.refills,
        notes: format!(
            "Expires: {}\n{}",
            format_date(prescription.expiration_date),
            prescription.description
        ),
        doctor_id: raw(prescription.doctor_id),
        patient_id: raw(prescription.patient_id),
    }
}

fn test_record(result: &TestResult) -> TestRecord {
    TestRecord {
        name: result.test_type.clone(),
        date: result.test_date,
        description: result.description.clone(),
        results: result.comment.clone(),
        released: result.is_released,
        doctor_id: raw(result.doctor_id),
        patient_id: raw(result.patient_id),
    }
}

fn log_entry_record(entry: &LogEntry) -> LogEntryRecord {
    LogEntryRecord {
        user_id: raw(entry.user_id),
        request_method: entry.request_method.clone(),
        request_secure: entry.request_secure,
        request_addr: entry.request_addr.clone(),
        description: entry.description(),
        hospital_id: raw(entry.hospital_id),
    }
}

/// Build an exporter holding every entity of a store snapshot
///
/// Users are grouped by role. Appointment attendees are split into doctor,
/// nurse and patient lists by looking up each attendee's role; attendees who
/// are administrators or unknown to the snapshot are left out.
pub fn export_dataset(dataset: &Dataset) -> HealthNetExport {
    let mut export = HealthNetExport::new();

    for hospital in &dataset.hospitals {
        export.add_hospital(
            hospital.id,
            HospitalRecord {
                name: hospital.name.clone(),
                addr: hospital.address.to_string(),
            },
        );
    }

    for user in &dataset.users {
        if let Role::Administrator(profile) = &user.role {
            export.add_admin(
                user.id,
                AdminRecord {
                    person: person(user),
                    primary_hospital_id: raw(profile.hospital_id),
                    hospital_ids: profile.hospital_id.into_iter().map(|id| Some(id.get())).collect(),
                },
            );
        }
    }

    for user in &dataset.users {
        if let Role::Doctor(profile) = &user.role {
            export.add_doctor(
                user.id,
                DoctorRecord {
                    person: person(user),
                    hospital_ids: raw_list(&profile.hospital_ids),
                    patient_ids: raw_list(&profile.patient_ids),
                },
            );
        }
    }

    for user in &dataset.users {
        if let Role::Nurse(profile) = &user.role {
            export.add_nurse(
                user.id,
                NurseRecord {
                    person: person(user),
                    primary_hospital_id: raw(profile.hospital_id),
                    doctor_ids: raw_list(&profile.doctor_ids),
                },
            );
        }
    }

    for user in &dataset.users {
        if let Role::Patient(profile) = &user.role {
            export.add_patient(
                user.id,
                PatientRecord {
                    person: person(user),
                    emergency_contact: profile.emergency_contact.clone(),
                    eye_color: profile.eye_color.clone(),
                    bloodtype: profile.bloodtype.clone(),
                    height: profile.height,
                    weight: profile.weight,
                    primary_hospital_id: raw(profile.hospital_id),
                    primary_doctor_id: raw(profile.primary_care_provider),
                    doctor_ids: raw_list(&profile.doctor_ids),
                },
            );
        }
    }

    for appointment in &dataset.appointments {
        export.add_appointment(appointment_record(appointment, dataset));
    }
    for result in &dataset.test_results {
        export.add_test(test_record(result));
    }
    for prescription in &dataset.prescriptions {
        export.add_prescription(prescription_record(prescription));
    }
    for entry in &dataset.log_entries {
        export.add_log_entry(log_entry_record(entry));
    }

    tracing::debug!(
        hospitals = export.document.hospitals.len(),
        users = dataset.users.len(),
        appointments = export.document.appointments.len(),
        "Dataset collected for export"
    );
    export
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Address, DoctorProfile, Hospital, HospitalId, NewAppointment, NewUser, NurseProfile,
        PatientProfile, PrescriptionId, UserId,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn person_named(username: &str) -> PersonFields {
        PersonFields {
            username: username.to_string(),
            ..Default::default()
        }
    }

    fn patient(username: &str, primary_doctor: Ref) -> PatientRecord {
        PatientRecord {
            person: person_named(username),
            emergency_contact: String::new(),
            eye_color: String::new(),
            bloodtype: String::new(),
            height: None,
            weight: None,
            primary_hospital_id: None,
            primary_doctor_id: primary_doctor,
            doctor_ids: vec![primary_doctor],
        }
    }

    #[test]
    fn test_references_become_indices() {
        let mut export = HealthNetExport::new();
        export
            .add_hospital(
                17_i64,
                HospitalRecord {
                    name: "General".to_string(),
                    addr: String::new(),
                },
            )
            .add_doctor(
                40_i64,
                DoctorRecord {
                    person: person_named("house"),
                    hospital_ids: vec![Some(17)],
                    patient_ids: vec![Some(91)],
                },
            )
            .add_doctor(
                42_i64,
                DoctorRecord {
                    person: person_named("wilson"),
                    hospital_ids: vec![],
                    patient_ids: vec![],
                },
            )
            .add_patient(91_i64, patient("pat", Some(42)));

        let document = export.export_document();
        assert_eq!(document.doctors[0].hospital_ids, vec![Some(0)]);
        assert_eq!(document.doctors[0].patient_ids, vec![Some(0)]);
        assert_eq!(document.patients[0].primary_doctor_id, Some(1));
        assert_eq!(document.patients[0].doctor_ids, vec![Some(1)]);
    }

    #[test]
    fn test_patients_resolved_once() {
        // Real id 1 maps to index 0 and real id 0 maps to index 1. Resolving the
        // patient twice would turn the doctor reference back into 1.
        let mut export = HealthNetExport::new();
        export
            .add_doctor(
                1_i64,
                DoctorRecord {
                    person: person_named("a"),
                    hospital_ids: vec![],
                    patient_ids: vec![],
                },
            )
            .add_doctor(
                0_i64,
                DoctorRecord {
                    person: person_named("b"),
                    hospital_ids: vec![],
                    patient_ids: vec![],
                },
            )
            .add_patient(5_i64, patient("p", Some(1)));

        let document = export.export_document();
        assert_eq!(document.patients[0].primary_doctor_id, Some(0));
    }

    #[test]
    fn test_unknown_and_null_references_kept() {
        let mut export = HealthNetExport::new();
        export.add_patient(5_i64, patient("p", None));
        export.add_prescription(PrescriptionRecord {
            name: "Amoxicillin".to_string(),
            dosage: 2,
            notes: String::new(),
            doctor_id: Some(999),
            patient_id: Some(5),
        });

        let document = export.export_document();
        assert_eq!(document.patients[0].primary_doctor_id, None);
        assert_eq!(document.prescriptions[0].doctor_id, Some(999));
        assert_eq!(document.prescriptions[0].patient_id, Some(0));
    }

    #[test]
    fn test_export_is_repeatable() {
        let mut export = HealthNetExport::new();
        export.add_patient(5_i64, patient("p", None));
        assert_eq!(export.export_json().unwrap(), export.export_json().unwrap());
    }

    #[test]
    fn test_export_dataset_mapping() {
        let hospital = Hospital {
            id: HospitalId::new(3),
            name: "General".to_string(),
            address: Address {
                line_1: "1 Main St".to_string(),
                line_2: String::new(),
                city: "Rochester".to_string(),
                state: "NY".to_string(),
                zipcode: "14623".to_string(),
            },
        };
        let doctor = NewUser::new(
            "house",
            Role::Doctor(DoctorProfile {
                hospital_ids: vec![HospitalId::new(3)],
                patient_ids: vec![],
            }),
        )
        .with_id(UserId::new(10));
        let nurse = NewUser::new("joy", Role::Nurse(NurseProfile::default())).with_id(UserId::new(11));
        let patient = NewUser::new(
            "pat",
            Role::Patient(PatientProfile {
                primary_care_provider: Some(UserId::new(10)),
                ..Default::default()
            }),
        )
        .with_id(UserId::new(12));

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let appointment = NewAppointment::new(
            "Checkup",
            start,
            start + chrono::Duration::hours(1),
            [UserId::new(10), UserId::new(11), UserId::new(12)],
        )
        .with_id(crate::domain::AppointmentId::new(1));

        let prescription = Prescription {
            id: PrescriptionId::new(1),
            patient_id: Some(UserId::new(12)),
            doctor_id: Some(UserId::new(10)),
            name: "Ibuprofen".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiration_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            refills: 3,
            description: "Take with food".to_string(),
        };

        let dataset = Dataset {
            hospitals: vec![hospital],
            users: vec![patient, nurse, doctor],
            appointments: vec![appointment],
            prescriptions: vec![prescription],
            ..Default::default()
        };

        let document = export_dataset(&dataset).export_document();
        assert_eq!(document.hospitals[0].addr, "1 Main St, Rochester, NY 14623");
        assert_eq!(document.doctors[0].hospital_ids, vec![Some(0)]);
        assert_eq!(document.patients[0].primary_doctor_id, Some(0));
        assert_eq!(document.appointments[0].doctor_ids, vec![Some(0)]);
        assert_eq!(document.appointments[0].nurse_ids, vec![Some(0)]);
        assert_eq!(document.appointments[0].patient_ids, vec![Some(0)]);
        assert_eq!(document.prescriptions[0].dosage, 3);
        assert_eq!(
            document.prescriptions[0].notes,
            "Expires: 2024-06-01\nTake with food"
        );
    }
}
