//! Integration tests for moving data between instances

use chrono::{NaiveDate, TimeZone, Utc};
use healthnet::adapters::memory::MemoryStore;
use healthnet::adapters::store::RecordStore;
use healthnet::core::calendar::Calendar;
use healthnet::core::porter::{
    export_dataset, import_into, EntityKind, HealthNetImport, PatientRecord,
};
use healthnet::domain::{
    Address, DoctorProfile, NewAppointment, NewHospital, NewTestResult, NewUser, PatientProfile,
    Role, RoleKind,
};
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

fn calendar() -> Arc<Calendar> {
    Arc::new(Calendar::new(Arc::new(MemoryStore::new())))
}

/// A source instance with one hospital, a doctor, and a patient under that doctor
async fn populated_source() -> Arc<Calendar> {
    let source = calendar();
    let store = source.store();

    let hospital = store
        .insert_hospital(NewHospital::new(
            "Strong Memorial",
            Address::single_line("601 Elmwood Ave"),
        ))
        .await
        .unwrap();
    let doctor = store
        .insert_user(
            NewUser::new(
                "house",
                Role::Doctor(DoctorProfile {
                    hospital_ids: vec![hospital.id],
                    patient_ids: Vec::new(),
                }),
            )
            .names("Gregory", "", "House")
            .approved(),
        )
        .await
        .unwrap();
    let patient = store
        .insert_user(
            NewUser::new(
                "jdoe",
                Role::Patient(PatientProfile {
                    hospital_id: Some(hospital.id),
                    primary_care_provider: Some(doctor.id),
                    doctor_ids: vec![doctor.id],
                    bloodtype: "AB+".to_string(),
                    ..Default::default()
                }),
            )
            .names("Jane", "", "Doe")
            .dob(NaiveDate::from_ymd_opt(1990, 4, 2))
            .approved(),
        )
        .await
        .unwrap();

    source
        .create_appointment(
            NewAppointment::new(
                "Checkup",
                Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
                [doctor.id, patient.id],
            )
            .description("Checkup"),
        )
        .await
        .unwrap();
    store
        .insert_test_result(NewTestResult {
            patient_id: Some(patient.id),
            doctor_id: Some(doctor.id),
            test_date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            test_type: "CBC".to_string(),
            release_date: None,
            description: "Complete blood count".to_string(),
            comment: "Normal".to_string(),
            is_released: false,
        })
        .await
        .unwrap();

    source
}

#[tokio::test]
async fn test_round_trip_preserves_primary_doctor() {
    let source = populated_source().await;
    let json = export_dataset(&source.store().snapshot().await.unwrap())
        .export_json()
        .unwrap();

    // Give the target existing rows so its ids differ from the source's
    let target = calendar();
    for name in ["Old General", "Old County"] {
        target
            .store()
            .insert_hospital(NewHospital::new(name, Address::default()))
            .await
            .unwrap();
    }
    for username in ["a", "b", "c"] {
        target
            .store()
            .insert_user(NewUser::new(
                username,
                Role::Doctor(DoctorProfile::default()),
            ))
            .await
            .unwrap();
    }

    let summary = import_into(&json, Arc::clone(&target)).await.unwrap();
    assert!(summary.is_complete(), "{summary}");
    assert_eq!(summary.created(EntityKind::Appointments), 1);
    assert_eq!(summary.created(EntityKind::Tests), 1);

    let store = target.store();
    let users = store.list_users(None).await.unwrap();
    let doctor = users.iter().find(|u| u.username == "house").unwrap();
    let patient = users.iter().find(|u| u.username == "jdoe").unwrap();
    let hospital = store
        .list_hospitals()
        .await
        .unwrap()
        .into_iter()
        .find(|h| h.name == "Strong Memorial")
        .unwrap();

    let profile = patient.as_patient().unwrap();
    assert_eq!(profile.primary_care_provider, Some(doctor.id));
    assert_eq!(profile.hospital_id, Some(hospital.id));
    assert_eq!(patient.dob, NaiveDate::from_ymd_opt(1990, 4, 2));

    let appointments = target.appointments_for_attendee(patient.id).await.unwrap();
    assert_eq!(appointments.len(), 1);
    assert!(appointments[0].is_attended_by(doctor.id));

    let results = store.list_test_results().await.unwrap();
    assert_eq!(results[0].patient_id, Some(patient.id));
    assert_eq!(results[0].doctor_id, Some(doctor.id));
}

#[tokio::test]
async fn test_failed_patient_does_not_abort_import() {
    let document = json!({
        "patients": [
            {"username": "p0", "first_name": "A", "last_name": "Zero"},
            {"username": "p1", "dob": "not-a-date"},
            {"username": "p2", "first_name": "C", "last_name": "Two"}
        ]
    });

    let target = calendar();
    let summary = import_into(&document.to_string(), Arc::clone(&target))
        .await
        .unwrap();

    assert_eq!(summary.created(EntityKind::Patients), 2);
    assert_eq!(summary.skipped(EntityKind::Patients), 1);
    assert_eq!(summary.failures[0].index, 1);

    let usernames: Vec<String> = target
        .store()
        .list_users(Some(RoleKind::Patient))
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(usernames, vec!["p0", "p2"]);
}

#[tokio::test]
async fn test_section_without_creator_is_not_imported() {
    let document = json!({
        "hospitals": [{"name": "Strong", "addr": "1 Main St"}],
        "patients": [{"username": "p0"}, {"username": "p1"}]
    });

    let calls = Arc::new(AtomicI64::new(0));
    let counter = Arc::clone(&calls);
    let mut import = HealthNetImport::from_json(&document.to_string())
        .unwrap()
        .with_hospitals(move |_record| {
            let id = counter.fetch_add(1, Ordering::SeqCst) + 100;
            async move { Ok(id) }
        });

    let summary = import.import_all().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.created(EntityKind::Hospitals), 1);
    assert!(summary.not_imported.contains(&EntityKind::Patients));
    assert_eq!(summary.created(EntityKind::Patients), 0);
    assert_eq!(import.maps().get(EntityKind::Hospitals, 0), Some(100));
}

#[tokio::test]
async fn test_patient_references_resolve_through_import_maps() {
    let document = json!({
        "doctors": [{"username": "d0"}, {"username": "d1"}],
        "patients": [{"username": "p0", "primary_doctor_id": 1, "doctor_ids": [0, 1, 9]}]
    });

    let seen = Arc::new(tokio::sync::Mutex::new(Vec::<PatientRecord>::new()));
    let sink = Arc::clone(&seen);
    let mut import = HealthNetImport::from_json(&document.to_string())
        .unwrap()
        .with_doctors(|record| async move { Ok(if record.person.username == "d0" { 40 } else { 41 }) })
        .with_patients(move |record| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().await.push(record);
                Ok(50)
            }
        });

    import.import_all().await;

    let seen = seen.lock().await;
    assert_eq!(seen[0].primary_doctor_id, Some(41));
    // Unknown references keep their raw value
    assert_eq!(seen[0].doctor_ids, vec![Some(40), Some(41), Some(9)]);
}

#[tokio::test]
async fn test_sub_second_appointment_survives_round_trip() {
    let source = populated_source().await;
    let users = source.store().list_users(None).await.unwrap();
    let attendees: Vec<_> = users.iter().map(|u| u.id).collect();

    let start = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()
        + chrono::Duration::milliseconds(100);
    let end = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()
        + chrono::Duration::milliseconds(900);
    let booking = source
        .create_appointment(NewAppointment::new("Quick", start, end, attendees).description("Quick"))
        .await
        .unwrap();
    assert!(booking.is_booked());

    let json = export_dataset(&source.store().snapshot().await.unwrap())
        .export_json()
        .unwrap();
    assert!(json.contains("2024-03-02T10:00:00.100+00:00"));

    let target = calendar();
    let summary = import_into(&json, Arc::clone(&target)).await.unwrap();
    assert!(summary.is_complete(), "{summary}");
    assert_eq!(summary.created(EntityKind::Appointments), 2);

    let imported = target.store().list_appointments().await.unwrap();
    let quick = imported.iter().find(|a| a.name == "Quick").unwrap();
    assert_eq!(quick.start, start);
    assert_eq!(quick.end, end);
}
