//! Domain models and types for HealthNet.
//!
//! This module contains the entity model shared by the calendar engine, the
//! porter and the record stores.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`HospitalId`], [`UserId`], [`AppointmentId`], ...)
//! - **Entities** ([`Hospital`], [`User`], [`Appointment`], [`Prescription`],
//!   [`TestResult`], [`LogEntry`])
//! - **Error types** ([`HealthNetError`], [`StorageError`], [`PorterError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes over `i64`, so a hospital id can't be passed where a
//! user id is expected:
//!
//! ```rust
//! use healthnet::domain::{HospitalId, UserId};
//!
//! let hospital = HospitalId::new(1);
//! let user = UserId::new(1);
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: UserId = hospital;
//! assert_eq!(hospital.get(), user.get());
//! ```
//!
//! # Roles
//!
//! A user carries exactly one [`Role`], and the role carries its profile:
//!
//! ```rust
//! use healthnet::domain::{NewUser, Role, PatientProfile, RoleKind, UserId};
//!
//! let patient = NewUser::new("jdoe", Role::Patient(PatientProfile::default()))
//!     .names("Jane", "", "Doe")
//!     .with_id(UserId::new(1));
//! assert!(patient.is(RoleKind::Patient));
//! ```

pub mod appointment;
pub mod context;
pub mod errors;
pub mod hospital;
pub mod ids;
pub mod log_entry;
pub mod prescription;
pub mod result;
pub mod test_result;
pub mod user;

// Re-export commonly used types for convenience
pub use appointment::{Appointment, AppointmentPatch, NewAppointment};
pub use errors::{HealthNetError, PorterError, StorageError};
pub use hospital::{Address, Hospital, NewHospital};
pub use ids::{AppointmentId, HospitalId, LogEntryId, PrescriptionId, TestResultId, UserId};
pub use log_entry::{LogEntry, LogLevel, NewLogEntry};
pub use prescription::{NewPrescription, Prescription};
pub use result::Result;
pub use test_result::{NewTestResult, TestResult};
pub use user::{
    AdministratorProfile, DoctorProfile, NewUser, NurseProfile, PatientProfile, Role, RoleKind,
    User,
};
