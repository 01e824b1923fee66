//! In-memory record store
//!
//! Tables live behind a `tokio::sync::RwLock`. When opened with a path, the
//! whole store is loaded from a JSON file and rewritten after every mutation, so
//! successive CLI runs see the same data.

use crate::adapters::store::RecordStore;
use crate::domain::{
    Appointment, AppointmentId, HealthNetError, Hospital, HospitalId, LogEntry, LogEntryId,
    NewAppointment, NewHospital, NewLogEntry, NewPrescription, NewTestResult, NewUser,
    Prescription, PrescriptionId, Result, RoleKind, StorageError, TestResult, TestResultId, User,
    UserId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Last identifier handed out per table
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Sequences {
    hospital: i64,
    user: i64,
    appointment: i64,
    prescription: i64,
    test_result: i64,
    log_entry: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    sequences: Sequences,
    #[serde(default)]
    hospitals: BTreeMap<i64, Hospital>,
    #[serde(default)]
    users: BTreeMap<i64, User>,
    #[serde(default)]
    appointments: BTreeMap<i64, Appointment>,
    #[serde(default)]
    prescriptions: BTreeMap<i64, Prescription>,
    #[serde(default)]
    test_results: BTreeMap<i64, TestResult>,
    #[serde(default)]
    log_entries: BTreeMap<i64, LogEntry>,
}

/// Record store keeping every table in memory
pub struct MemoryStore {
    tables: RwLock<Tables>,
    path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty, purely in-memory store
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            path: None,
        }
    }

    /// Open a store backed by a JSON file
    ///
    /// A missing file yields an empty store; the file is created on the first
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageError::PersistFailed(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Store file not found, starting empty");
                Tables::default()
            }
            Err(e) => {
                return Err(StorageError::PersistFailed(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
                .into())
            }
        };

        Ok(Self {
            tables: RwLock::new(tables),
            path: Some(path),
        })
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, tables: &Tables) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::PersistFailed(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let contents = serde_json::to_string_pretty(tables)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await.map_err(|e| {
            StorageError::PersistFailed(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            StorageError::PersistFailed(format!("Failed to replace {}: {}", path.display(), e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_hospital(&self, hospital: NewHospital) -> Result<Hospital> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.hospital);
        let hospital = hospital.with_id(HospitalId::new(id));
        tables.hospitals.insert(id, hospital.clone());
        self.persist(&tables).await?;
        Ok(hospital)
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>> {
        Ok(self.tables.read().await.hospitals.values().cloned().collect())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::InsertFailed {
                kind: "user",
                message: format!("username '{}' already exists", user.username),
            }
            .into());
        }
        let id = next(&mut tables.sequences.user);
        let user = user.with_id(UserId::new(id));
        tables.users.insert(id, user.clone());
        self.persist(&tables).await?;
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id.get()).cloned())
    }

    async fn list_users(&self, kind: Option<RoleKind>) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| kind.map_or(true, |k| u.is(k)))
            .cloned()
            .collect())
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.appointment);
        let appointment = appointment.with_id(AppointmentId::new(id));
        tables.appointments.insert(id, appointment.clone());
        self.persist(&tables).await?;
        Ok(appointment)
    }

    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>> {
        Ok(self.tables.read().await.appointments.get(&id.get()).cloned())
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.appointments.get_mut(&appointment.id.get()) {
            Some(stored) => *stored = appointment.clone(),
            None => {
                return Err(HealthNetError::NotFound(format!(
                    "appointment {}",
                    appointment.id
                )))
            }
        }
        self.persist(&tables).await
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let existed = tables.appointments.remove(&id.get()).is_some();
        if existed {
            self.persist(&tables).await?;
        }
        Ok(existed)
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        Ok(self.tables.read().await.appointments.values().cloned().collect())
    }

    async fn insert_prescription(&self, prescription: NewPrescription) -> Result<Prescription> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.prescription);
        let prescription = prescription.with_id(PrescriptionId::new(id));
        tables.prescriptions.insert(id, prescription.clone());
        self.persist(&tables).await?;
        Ok(prescription)
    }

    async fn list_prescriptions(&self) -> Result<Vec<Prescription>> {
        Ok(self.tables.read().await.prescriptions.values().cloned().collect())
    }

    async fn insert_test_result(&self, result: NewTestResult) -> Result<TestResult> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.test_result);
        let result = result.with_id(TestResultId::new(id));
        tables.test_results.insert(id, result.clone());
        self.persist(&tables).await?;
        Ok(result)
    }

    async fn list_test_results(&self) -> Result<Vec<TestResult>> {
        Ok(self.tables.read().await.test_results.values().cloned().collect())
    }

    async fn insert_log_entry(&self, entry: NewLogEntry) -> Result<LogEntry> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.log_entry);
        let entry = entry.with_id(LogEntryId::new(id));
        tables.log_entries.insert(id, entry.clone());
        self.persist(&tables).await?;
        Ok(entry)
    }

    async fn list_log_entries(&self) -> Result<Vec<LogEntry>> {
        Ok(self.tables.read().await.log_entries.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, DoctorProfile, PatientProfile, Role};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn doctor(username: &str) -> NewUser {
        NewUser::new(username, Role::Doctor(DoctorProfile::default()))
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store
            .insert_hospital(NewHospital::new("A", Address::default()))
            .await
            .unwrap();
        let b = store
            .insert_hospital(NewHospital::new("B", Address::default()))
            .await
            .unwrap();
        assert_eq!(a.id, HospitalId::new(1));
        assert_eq!(b.id, HospitalId::new(2));
        assert_eq!(store.list_hospitals().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        store.insert_user(doctor("house")).await.unwrap();
        let err = store.insert_user(doctor("house")).await.unwrap_err();
        assert!(matches!(
            err,
            HealthNetError::Storage(StorageError::InsertFailed { kind: "user", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_users_by_role() {
        let store = MemoryStore::new();
        store.insert_user(doctor("house")).await.unwrap();
        store
            .insert_user(NewUser::new("jdoe", Role::Patient(PatientProfile::default())))
            .await
            .unwrap();

        assert_eq!(store.list_users(None).await.unwrap().len(), 2);
        let patients = store.list_users(Some(RoleKind::Patient)).await.unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].username, "jdoe");
    }

    #[tokio::test]
    async fn test_update_and_delete_appointment() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut apt = store
            .insert_appointment(NewAppointment::new("Visit", start, end, [UserId::new(1)]))
            .await
            .unwrap();

        apt.name = "Renamed".to_string();
        store.update_appointment(&apt).await.unwrap();
        let stored = store.get_appointment(apt.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");

        assert!(store.delete_appointment(apt.id).await.unwrap());
        assert!(!store.delete_appointment(apt.id).await.unwrap());
        assert!(matches!(
            store.update_appointment(&apt).await,
            Err(HealthNetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let first = store
            .insert_appointment(NewAppointment::new("A", start, end, [UserId::new(1)]))
            .await
            .unwrap();
        store.delete_appointment(first.id).await.unwrap();
        let second = store
            .insert_appointment(NewAppointment::new("B", start, end, [UserId::new(1)]))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_persists_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("store.json");

        {
            let store = MemoryStore::open(&path).await.unwrap();
            store.insert_user(doctor("house")).await.unwrap();
            store
                .insert_user(NewUser::new("jdoe", Role::Patient(PatientProfile::default())))
                .await
                .unwrap();
        }

        let reopened = MemoryStore::open(&path).await.unwrap();
        let users = reopened.list_users(None).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[1].is(RoleKind::Patient));

        let next = reopened.insert_user(doctor("wilson")).await.unwrap();
        assert_eq!(next.id, UserId::new(3));
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let result = MemoryStore::open(&path).await;
        assert!(matches!(
            result,
            Err(HealthNetError::Storage(StorageError::PersistFailed(_)))
        ));
    }
}
