//! Importing into a record store
//!
//! Binds every creator of a [`HealthNetImport`] to a store. Addresses arrive
//! as one line and land in `line_1`, imported accounts are approved, and
//! appointments go through the [`Calendar`] so an imported appointment that
//! would double-book someone is skipped.

use super::import::HealthNetImport;
use super::records::{
    present, AdminRecord, AppointmentRecord, DoctorRecord, HospitalRecord, LogEntryRecord,
    NurseRecord, PatientRecord, PersonFields, PrescriptionRecord, TestRecord,
};
use super::summary::ImportSummary;
use crate::core::calendar::{Booking, Calendar};
use crate::domain::context::ResultExt;
use crate::domain::{
    Address, AdministratorProfile, DoctorProfile, HealthNetError, HospitalId, NewAppointment,
    NewHospital, NewLogEntry, NewPrescription, NewTestResult, NewUser, NurseProfile,
    PatientProfile, Result, Role, UserId,
};
use chrono::Utc;
use std::sync::Arc;

/// Name given to imported appointments that carry no description
pub const DEFAULT_APPOINTMENT_NAME: &str = "Imported appointment";

fn account(person: PersonFields, role: Role) -> NewUser {
    NewUser::new(person.username, role)
        .names(person.first_name, person.middle_name, person.last_name)
        .password_hash(person.password_hash)
        .email(person.email)
        .dob(person.dob)
        .phone(person.phone)
        .address(Address::single_line(person.addr))
        .approved()
}

fn hospital_ids(refs: &[Option<i64>]) -> Vec<HospitalId> {
    present(refs).map(HospitalId::new).collect()
}

fn user_ids(refs: &[Option<i64>]) -> Vec<UserId> {
    present(refs).map(UserId::new).collect()
}

async fn create_hospital(calendar: Arc<Calendar>, record: HospitalRecord) -> Result<i64> {
    let name = record.name.clone();
    let hospital = NewHospital::new(record.name, Address::single_line(record.addr));
    let created = calendar
        .store()
        .insert_hospital(hospital)
        .await
        .with_context(|| format!("hospital '{name}'"))?;
    Ok(created.id.get())
}

async fn create_user(calendar: Arc<Calendar>, user: NewUser) -> Result<i64> {
    let username = user.username.clone();
    let created = calendar
        .store()
        .insert_user(user)
        .await
        .with_context(|| format!("user '{username}'"))?;
    Ok(created.id.get())
}

fn admin_account(record: AdminRecord) -> NewUser {
    let hospital_id = record
        .primary_hospital_id
        .or_else(|| present(&record.hospital_ids).next())
        .map(HospitalId::new);
    account(
        record.person,
        Role::Administrator(AdministratorProfile { hospital_id }),
    )
}

fn doctor_account(record: DoctorRecord) -> NewUser {
    let profile = DoctorProfile {
        hospital_ids: hospital_ids(&record.hospital_ids),
        patient_ids: user_ids(&record.patient_ids),
    };
    account(record.person, Role::Doctor(profile))
}

fn nurse_account(record: NurseRecord) -> NewUser {
    let profile = NurseProfile {
        hospital_id: record.primary_hospital_id.map(HospitalId::new),
        doctor_ids: user_ids(&record.doctor_ids),
    };
    account(record.person, Role::Nurse(profile))
}

fn patient_account(record: PatientRecord) -> NewUser {
    let profile = PatientProfile {
        emergency_contact: record.emergency_contact,
        eye_color: record.eye_color,
        bloodtype: record.bloodtype,
        height: record.height,
        weight: record.weight,
        hospital_id: record.primary_hospital_id.map(HospitalId::new),
        primary_care_provider: record.primary_doctor_id.map(UserId::new),
        doctor_ids: user_ids(&record.doctor_ids),
        is_admitted: false,
    };
    account(record.person, Role::Patient(profile))
}

async fn create_appointment(calendar: Arc<Calendar>, record: AppointmentRecord) -> Result<i64> {
    // Only attendees that exist in the target store take part
    let mut attendees = Vec::new();
    for id in record.attendee_refs().map(UserId::new) {
        if calendar.store().get_user(id).await?.is_some() && !attendees.contains(&id) {
            attendees.push(id);
        }
    }
    let creator = attendees.first().copied();

    let name = if record.description.is_empty() {
        DEFAULT_APPOINTMENT_NAME.to_string()
    } else {
        record.description.clone()
    };
    let request = NewAppointment::new(name, record.start, record.end, attendees)
        .description(record.description)
        .location(record.location)
        .creator(creator);

    match calendar.create_appointment(request).await? {
        Booking::Booked(appointment) => Ok(appointment.id.get()),
        Booking::Rejected { reason } => Err(HealthNetError::Validation(reason)),
    }
}

async fn create_test(calendar: Arc<Calendar>, record: TestRecord) -> Result<i64> {
    let result = NewTestResult {
        patient_id: record.patient_id.map(UserId::new),
        doctor_id: record.doctor_id.map(UserId::new),
        test_date: record.date,
        test_type: record.name,
        release_date: record.released.then_some(record.date),
        description: record.description,
        comment: record.results,
        is_released: record.released,
    };
    Ok(calendar.store().insert_test_result(result).await?.id.get())
}

async fn create_prescription(calendar: Arc<Calendar>, record: PrescriptionRecord) -> Result<i64> {
    let today = Utc::now().date_naive();
    let prescription = NewPrescription {
        patient_id: record.patient_id.map(UserId::new),
        doctor_id: record.doctor_id.map(UserId::new),
        name: record.name,
        issue_date: today,
        expiration_date: today,
        refills: record.dosage,
        description: record.notes,
    };
    Ok(calendar
        .store()
        .insert_prescription(prescription)
        .await?
        .id
        .get())
}

async fn create_log_entry(calendar: Arc<Calendar>, record: LogEntryRecord) -> Result<i64> {
    let mut entry =
        NewLogEntry::info(record.description).hospital(record.hospital_id.map(HospitalId::new));
    entry.request_method = record.request_method;
    entry.request_secure = record.request_secure;
    entry.request_addr = record.request_addr;
    Ok(calendar.store().insert_log_entry(entry).await?.id.get())
}

/// Register store-backed creators for every section
pub fn bind_calendar(import: HealthNetImport, calendar: Arc<Calendar>) -> HealthNetImport {
    let hospitals = Arc::clone(&calendar);
    let admins = Arc::clone(&calendar);
    let doctors = Arc::clone(&calendar);
    let nurses = Arc::clone(&calendar);
    let patients = Arc::clone(&calendar);
    let appointments = Arc::clone(&calendar);
    let tests = Arc::clone(&calendar);
    let prescriptions = Arc::clone(&calendar);
    let log_entries = calendar;

    import
        .with_hospitals(move |record| create_hospital(Arc::clone(&hospitals), record))
        .with_admins(move |record| create_user(Arc::clone(&admins), admin_account(record)))
        .with_doctors(move |record| create_user(Arc::clone(&doctors), doctor_account(record)))
        .with_nurses(move |record| create_user(Arc::clone(&nurses), nurse_account(record)))
        .with_patients(move |record| create_user(Arc::clone(&patients), patient_account(record)))
        .with_appointments(move |record| create_appointment(Arc::clone(&appointments), record))
        .with_tests(move |record| create_test(Arc::clone(&tests), record))
        .with_prescriptions(move |record| {
            create_prescription(Arc::clone(&prescriptions), record)
        })
        .with_log_entries(move |record| create_log_entry(Arc::clone(&log_entries), record))
}

/// Import a document into the calendar's store
///
/// # Errors
///
/// Fails only if the document itself can't be read; skipped records are
/// reported in the summary.
pub async fn import_into(json: &str, calendar: Arc<Calendar>) -> Result<ImportSummary> {
    let mut import = bind_calendar(HealthNetImport::from_json(json)?, calendar);
    Ok(import.import_all().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::adapters::store::RecordStore;
    use crate::core::porter::EntityKind;
    use crate::domain::RoleKind;
    use serde_json::json;

    fn calendar() -> Arc<Calendar> {
        Arc::new(Calendar::new(Arc::new(MemoryStore::new())))
    }

    fn person(username: &str) -> serde_json::Value {
        json!({
            "username": username, "password_hash": "hash", "first_name": "F",
            "middle_name": "", "last_name": "L", "dob": "1970-01-01",
            "addr": "1 Main St", "email": "", "phone": "555"
        })
    }

    fn with(mut base: serde_json::Value, extra: serde_json::Value) -> serde_json::Value {
        if let (Some(target), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        base
    }

    #[tokio::test]
    async fn test_import_populates_store() {
        let document = json!({
            "hospitals": [{"name": "General", "addr": "1 Main St, Rochester, NY 14623"}],
            "doctors": [with(person("house"), json!({"hospital_ids": [0], "patient_ids": []}))],
            "nurses": [with(person("joy"), json!({"primary_hospital_id": 0, "doctor_ids": [0]}))],
            "patients": [with(person("pat"), json!({
                "emergency_contact": "", "eye_color": "", "bloodtype": "O-",
                "height": 70, "weight": 180, "primary_hospital_id": 0,
                "primary_doctor_id": 0, "doctor_ids": [0]
            }))],
            "appointments": [{
                "start": "2024-03-01T10:00:00+00:00", "end": "2024-03-01T11:00:00+00:00",
                "location": "Room 1", "description": "Checkup",
                "doctor_ids": [0], "nurse_ids": [0], "patient_ids": [0]
            }],
            "prescriptions": [{"name": "Ibuprofen", "dosage": 2, "notes": "Daily",
                               "doctor_id": 0, "patient_id": 0}],
            "tests": [{"name": "Blood panel", "date": "2024-02-01", "description": "",
                       "results": "Normal", "released": true, "doctor_id": 0, "patient_id": 0}],
            "log_entries": [{"user_id": 3, "request_method": "GET", "request_secure": false,
                             "request_addr": "10.0.0.1", "description": "Login", "hospital_id": 0}]
        });

        let calendar = calendar();
        let summary = import_into(&document.to_string(), Arc::clone(&calendar))
            .await
            .unwrap();
        assert!(summary.is_complete(), "{summary}");

        let store = calendar.store();
        let hospital = &store.list_hospitals().await.unwrap()[0];
        assert_eq!(hospital.address.line_1, "1 Main St, Rochester, NY 14623");

        let doctor = &store.list_users(Some(RoleKind::Doctor)).await.unwrap()[0];
        assert!(!doctor.is_pending);
        let patient = &store.list_users(Some(RoleKind::Patient)).await.unwrap()[0];
        let profile = patient.as_patient().unwrap();
        assert_eq!(profile.primary_care_provider, Some(doctor.id));
        assert_eq!(profile.hospital_id, Some(hospital.id));

        let appointment = &store.list_appointments().await.unwrap()[0];
        assert_eq!(appointment.attendees.len(), 3);
        assert_eq!(appointment.creator, Some(doctor.id));

        let prescription = &store.list_prescriptions().await.unwrap()[0];
        assert_eq!(prescription.refills, 2);
        assert_eq!(prescription.patient_id, Some(patient.id));

        let result = &store.list_test_results().await.unwrap()[0];
        assert_eq!(result.test_type, "Blood panel");
        assert!(result.is_released);

        // One entry from the calendar, one imported
        let log = store.list_log_entries().await.unwrap();
        assert!(log.iter().any(|entry| entry.message == "Login"));
        assert_eq!(summary.created(EntityKind::LogEntries), 1);
    }

    #[tokio::test]
    async fn test_conflicting_appointment_is_skipped() {
        let slot = json!({
            "start": "2024-03-01T10:00:00", "end": "2024-03-01T11:00:00",
            "location": "", "description": "Visit",
            "doctor_ids": [0], "nurse_ids": [], "patient_ids": []
        });
        let document = json!({
            "doctors": [with(person("house"), json!({"hospital_ids": [], "patient_ids": []}))],
            "appointments": [slot.clone(), slot]
        });

        let calendar = calendar();
        let summary = import_into(&document.to_string(), Arc::clone(&calendar))
            .await
            .unwrap();
        assert_eq!(summary.created(EntityKind::Appointments), 1);
        assert_eq!(summary.skipped(EntityKind::Appointments), 1);
        assert_eq!(calendar.store().list_appointments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_attendees_dropped() {
        let document = json!({
            "appointments": [{
                "start": "2024-03-01T10:00:00", "end": "2024-03-01T11:00:00",
                "location": "", "description": "",
                "doctor_ids": [42], "nurse_ids": [], "patient_ids": []
            }]
        });
        let summary = import_into(&document.to_string(), calendar()).await.unwrap();
        // No attendee survives, so the calendar refuses the booking
        assert_eq!(summary.skipped(EntityKind::Appointments), 1);
    }
}
