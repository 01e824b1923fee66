//! Record store abstraction traits
//!
//! This module defines the trait that storage adapters must implement to hold
//! the HealthNet entity graph, and the [`Dataset`] snapshot the porter exports.

use crate::domain::{
    Appointment, AppointmentId, Hospital, LogEntry, NewAppointment, NewHospital, NewLogEntry,
    NewPrescription, NewTestResult, NewUser, Prescription, Result, RoleKind, TestResult, User,
    UserId,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;

/// Record store trait for the HealthNet entity graph
///
/// Stores assign identifiers on insert and return the stored entity. Reads of
/// a missing record return `Ok(None)`; only backend failures are errors.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and status output
    fn backend_name(&self) -> &'static str;

    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the schema exists, creating it if necessary
    async fn ensure_schema(&self) -> Result<()>;

    async fn insert_hospital(&self, hospital: NewHospital) -> Result<Hospital>;

    async fn list_hospitals(&self) -> Result<Vec<Hospital>>;

    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// List users, optionally restricted to one role
    async fn list_users(&self, kind: Option<RoleKind>) -> Result<Vec<User>>;

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment>;

    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>>;

    /// Replace a stored appointment
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error if no appointment has this id.
    async fn update_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Delete an appointment, returning whether it existed
    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool>;

    async fn list_appointments(&self) -> Result<Vec<Appointment>>;

    /// Appointments attended by at least one of `attendees`
    ///
    /// The default implementation filters [`RecordStore::list_appointments`];
    /// backends with an index should override it.
    async fn appointments_for_attendees(
        &self,
        attendees: &BTreeSet<UserId>,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .list_appointments()
            .await?
            .into_iter()
            .filter(|apt| apt.shares_attendee(attendees))
            .collect())
    }

    async fn insert_prescription(&self, prescription: NewPrescription) -> Result<Prescription>;

    async fn list_prescriptions(&self) -> Result<Vec<Prescription>>;

    async fn insert_test_result(&self, result: NewTestResult) -> Result<TestResult>;

    async fn list_test_results(&self) -> Result<Vec<TestResult>>;

    async fn insert_log_entry(&self, entry: NewLogEntry) -> Result<LogEntry>;

    async fn list_log_entries(&self) -> Result<Vec<LogEntry>>;

    /// Read every entity into a [`Dataset`]
    async fn snapshot(&self) -> Result<Dataset> {
        Ok(Dataset {
            hospitals: self.list_hospitals().await?,
            users: self.list_users(None).await?,
            appointments: self.list_appointments().await?,
            prescriptions: self.list_prescriptions().await?,
            test_results: self.list_test_results().await?,
            log_entries: self.list_log_entries().await?,
        })
    }
}

/// In-memory snapshot of every entity in a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub hospitals: Vec<Hospital>,
    pub users: Vec<User>,
    pub appointments: Vec<Appointment>,
    pub prescriptions: Vec<Prescription>,
    pub test_results: Vec<TestResult>,
    pub log_entries: Vec<LogEntry>,
}

impl Dataset {
    /// Users of one role, in store order
    pub fn users_of(&self, kind: RoleKind) -> impl Iterator<Item = &User> {
        self.users.iter().filter(move |user| user.is(kind))
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn counts(&self) -> DatasetCounts {
        let role_count = |kind| self.users_of(kind).count();
        DatasetCounts {
            hospitals: self.hospitals.len(),
            admins: role_count(RoleKind::Administrator),
            doctors: role_count(RoleKind::Doctor),
            nurses: role_count(RoleKind::Nurse),
            patients: role_count(RoleKind::Patient),
            appointments: self.appointments.len(),
            prescriptions: self.prescriptions.len(),
            test_results: self.test_results.len(),
            log_entries: self.log_entries.len(),
        }
    }
}

/// Entity counts of a [`Dataset`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetCounts {
    pub hospitals: usize,
    pub admins: usize,
    pub doctors: usize,
    pub nurses: usize,
    pub patients: usize,
    pub appointments: usize,
    pub prescriptions: usize,
    pub test_results: usize,
    pub log_entries: usize,
}

impl DatasetCounts {
    pub fn total(&self) -> usize {
        self.hospitals
            + self.admins
            + self.doctors
            + self.nurses
            + self.patients
            + self.appointments
            + self.prescriptions
            + self.test_results
            + self.log_entries
    }
}

impl fmt::Display for DatasetCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Hospitals:      {}", self.hospitals)?;
        writeln!(f, "  Administrators: {}", self.admins)?;
        writeln!(f, "  Doctors:        {}", self.doctors)?;
        writeln!(f, "  Nurses:         {}", self.nurses)?;
        writeln!(f, "  Patients:       {}", self.patients)?;
        writeln!(f, "  Appointments:   {}", self.appointments)?;
        writeln!(f, "  Prescriptions:  {}", self.prescriptions)?;
        writeln!(f, "  Test results:   {}", self.test_results)?;
        write!(f, "  Log entries:    {}", self.log_entries)
    }
}
