//! Row mapping for the PostgreSQL store
//!
//! Converts `tokio_postgres` rows into domain entities. Structured columns
//! (addresses, role payloads) are stored as JSONB.

use crate::domain::{
    Address, Appointment, AppointmentId, Hospital, HospitalId, LogEntry, LogEntryId, LogLevel,
    Prescription, PrescriptionId, Result, Role, StorageError, TestResult, TestResultId, User,
    UserId,
};
use serde_json::Value;
use tokio_postgres::Row;

pub const HOSPITAL_COLUMNS: &str = "id, name, address";

pub const USER_COLUMNS: &str = "id, username, password_hash, email, first_name, middle_name, \
     last_name, dob, phone, address, is_pending, role";

pub const APPOINTMENT_COLUMNS: &str =
    "id, name, description, location, tstart, tend, attendees, creator_id";

pub const PRESCRIPTION_COLUMNS: &str =
    "id, patient_id, doctor_id, name, issue_date, expiration_date, refills, description";

pub const TEST_RESULT_COLUMNS: &str = "id, patient_id, doctor_id, test_date, test_type, \
     release_date, description, comment, is_released";

pub const LOG_ENTRY_COLUMNS: &str = "id, logged_at, level, message, user_id, request_method, \
     request_secure, request_addr, hospital_id";

fn column<'a, T>(row: &'a Row, name: &str, table: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name).map_err(|e| {
        StorageError::CorruptRecord(format!("{table}.{name}: {e}")).into()
    })
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row, name: &str, table: &str) -> Result<T> {
    let value: Value = column(row, name, table)?;
    serde_json::from_value(value)
        .map_err(|e| StorageError::CorruptRecord(format!("{table}.{name}: {e}")).into())
}

/// Serializes a value for a JSONB parameter
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

pub fn hospital_from_row(row: &Row) -> Result<Hospital> {
    Ok(Hospital {
        id: HospitalId::new(column(row, "id", "hospitals")?),
        name: column(row, "name", "hospitals")?,
        address: json_column::<Address>(row, "address", "hospitals")?,
    })
}

pub fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: UserId::new(column(row, "id", "users")?),
        username: column(row, "username", "users")?,
        password_hash: column(row, "password_hash", "users")?,
        email: column(row, "email", "users")?,
        first_name: column(row, "first_name", "users")?,
        middle_name: column(row, "middle_name", "users")?,
        last_name: column(row, "last_name", "users")?,
        dob: column(row, "dob", "users")?,
        phone: column(row, "phone", "users")?,
        address: json_column(row, "address", "users")?,
        is_pending: column(row, "is_pending", "users")?,
        role: json_column::<Role>(row, "role", "users")?,
    })
}

pub fn appointment_from_row(row: &Row) -> Result<Appointment> {
    let attendees: Vec<i64> = column(row, "attendees", "appointments")?;
    let creator: Option<i64> = column(row, "creator_id", "appointments")?;
    Ok(Appointment {
        id: AppointmentId::new(column(row, "id", "appointments")?),
        name: column(row, "name", "appointments")?,
        description: column(row, "description", "appointments")?,
        location: column(row, "location", "appointments")?,
        start: column(row, "tstart", "appointments")?,
        end: column(row, "tend", "appointments")?,
        attendees: attendees.into_iter().map(UserId::new).collect(),
        creator: creator.map(UserId::new),
    })
}

pub fn prescription_from_row(row: &Row) -> Result<Prescription> {
    let patient: Option<i64> = column(row, "patient_id", "prescriptions")?;
    let doctor: Option<i64> = column(row, "doctor_id", "prescriptions")?;
    Ok(Prescription {
        id: PrescriptionId::new(column(row, "id", "prescriptions")?),
        patient_id: patient.map(UserId::new),
        doctor_id: doctor.map(UserId::new),
        name: column(row, "name", "prescriptions")?,
        issue_date: column(row, "issue_date", "prescriptions")?,
        expiration_date: column(row, "expiration_date", "prescriptions")?,
        refills: column(row, "refills", "prescriptions")?,
        description: column(row, "description", "prescriptions")?,
    })
}

pub fn test_result_from_row(row: &Row) -> Result<TestResult> {
    let patient: Option<i64> = column(row, "patient_id", "test_results")?;
    let doctor: Option<i64> = column(row, "doctor_id", "test_results")?;
    Ok(TestResult {
        id: TestResultId::new(column(row, "id", "test_results")?),
        patient_id: patient.map(UserId::new),
        doctor_id: doctor.map(UserId::new),
        test_date: column(row, "test_date", "test_results")?,
        test_type: column(row, "test_type", "test_results")?,
        release_date: column(row, "release_date", "test_results")?,
        description: column(row, "description", "test_results")?,
        comment: column(row, "comment", "test_results")?,
        is_released: column(row, "is_released", "test_results")?,
    })
}

pub fn log_entry_from_row(row: &Row) -> Result<LogEntry> {
    let level: String = column(row, "level", "log_entries")?;
    let user: Option<i64> = column(row, "user_id", "log_entries")?;
    let hospital: Option<i64> = column(row, "hospital_id", "log_entries")?;
    Ok(LogEntry {
        id: LogEntryId::new(column(row, "id", "log_entries")?),
        timestamp: column(row, "logged_at", "log_entries")?,
        level: level
            .parse::<LogLevel>()
            .map_err(|e| StorageError::CorruptRecord(format!("log_entries.level: {e}")))?,
        message: column(row, "message", "log_entries")?,
        user_id: user.map(UserId::new),
        request_method: column(row, "request_method", "log_entries")?,
        request_secure: column(row, "request_secure", "log_entries")?,
        request_addr: column(row, "request_addr", "log_entries")?,
        hospital_id: hospital.map(HospitalId::new),
    })
}

/// Raw id of an optional reference, for nullable BIGINT parameters
pub fn raw_id<T: Into<i64>>(id: Option<T>) -> Option<i64> {
    id.map(Into::into)
}
