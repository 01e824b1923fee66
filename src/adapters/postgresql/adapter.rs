//! PostgreSQL implementation of the record store

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    appointment_from_row, hospital_from_row, log_entry_from_row, prescription_from_row, raw_id,
    test_result_from_row, to_json, user_from_row, APPOINTMENT_COLUMNS, HOSPITAL_COLUMNS,
    LOG_ENTRY_COLUMNS, PRESCRIPTION_COLUMNS, TEST_RESULT_COLUMNS, USER_COLUMNS,
};
use crate::adapters::store::RecordStore;
use crate::domain::{
    Appointment, AppointmentId, HealthNetError, Hospital, HospitalId, LogEntry, LogEntryId,
    NewAppointment, NewHospital, NewLogEntry, NewPrescription, NewTestResult, NewUser,
    Prescription, PrescriptionId, Result, RoleKind, TestResult, TestResultId, User, UserId,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Record store backed by PostgreSQL
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

fn role_kind_text(kind: RoleKind) -> &'static str {
    match kind {
        RoleKind::Administrator => "administrator",
        RoleKind::Doctor => "doctor",
        RoleKind::Nurse => "nurse",
        RoleKind::Patient => "patient",
    }
}

fn attendee_array(attendees: &BTreeSet<UserId>) -> Vec<i64> {
    attendees.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl RecordStore for PostgreSQLStore {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn insert_hospital(&self, hospital: NewHospital) -> Result<Hospital> {
        let address = to_json(&hospital.address)?;
        let id = self
            .client
            .insert_returning_id(
                "hospital",
                "INSERT INTO hospitals (name, address) VALUES ($1, $2) RETURNING id",
                &[&hospital.name, &address],
            )
            .await?;
        Ok(hospital.with_id(HospitalId::new(id)))
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>> {
        let query = format!("SELECT {HOSPITAL_COLUMNS} FROM hospitals ORDER BY id");
        self.client
            .query(&query, &[])
            .await?
            .iter()
            .map(hospital_from_row)
            .collect()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let address = to_json(&user.address)?;
        let role = to_json(&user.role)?;
        let kind = role_kind_text(user.role.kind());
        let id = self
            .client
            .insert_returning_id(
                "user",
                "INSERT INTO users (username, password_hash, email, first_name, middle_name, \
                 last_name, dob, phone, address, is_pending, role_kind, role) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
                &[
                    &user.username,
                    &user.password_hash,
                    &user.email,
                    &user.first_name,
                    &user.middle_name,
                    &user.last_name,
                    &user.dob,
                    &user.phone,
                    &address,
                    &user.is_pending,
                    &kind,
                    &role,
                ],
            )
            .await?;
        Ok(user.with_id(UserId::new(id)))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        self.client
            .query_opt(&query, &[&id.get()])
            .await?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    async fn list_users(&self, kind: Option<RoleKind>) -> Result<Vec<User>> {
        let rows = match kind {
            Some(kind) => {
                let query =
                    format!("SELECT {USER_COLUMNS} FROM users WHERE role_kind = $1 ORDER BY id");
                self.client.query(&query, &[&role_kind_text(kind)]).await?
            }
            None => {
                let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
                self.client.query(&query, &[]).await?
            }
        };
        rows.iter().map(user_from_row).collect()
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let attendees = attendee_array(&appointment.attendees);
        let creator = raw_id(appointment.creator);
        let id = self
            .client
            .insert_returning_id(
                "appointment",
                "INSERT INTO appointments (name, description, location, tstart, tend, \
                 attendees, creator_id) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
                &[
                    &appointment.name,
                    &appointment.description,
                    &appointment.location,
                    &appointment.start,
                    &appointment.end,
                    &attendees,
                    &creator,
                ],
            )
            .await?;
        Ok(appointment.with_id(AppointmentId::new(id)))
    }

    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>> {
        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1");
        self.client
            .query_opt(&query, &[&id.get()])
            .await?
            .as_ref()
            .map(appointment_from_row)
            .transpose()
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<()> {
        let attendees = attendee_array(&appointment.attendees);
        let creator = raw_id(appointment.creator);
        let updated = self
            .client
            .execute(
                "UPDATE appointments SET name = $2, description = $3, location = $4, \
                 tstart = $5, tend = $6, attendees = $7, creator_id = $8 WHERE id = $1",
                &[
                    &appointment.id.get(),
                    &appointment.name,
                    &appointment.description,
                    &appointment.location,
                    &appointment.start,
                    &appointment.end,
                    &attendees,
                    &creator,
                ],
            )
            .await?;

        if updated == 0 {
            return Err(HealthNetError::NotFound(format!(
                "appointment {}",
                appointment.id
            )));
        }
        Ok(())
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool> {
        let deleted = self
            .client
            .execute("DELETE FROM appointments WHERE id = $1", &[&id.get()])
            .await?;
        Ok(deleted > 0)
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY id");
        self.client
            .query(&query, &[])
            .await?
            .iter()
            .map(appointment_from_row)
            .collect()
    }

    async fn appointments_for_attendees(
        &self,
        attendees: &BTreeSet<UserId>,
    ) -> Result<Vec<Appointment>> {
        let attendees = attendee_array(attendees);
        let query = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE attendees && $1 ORDER BY id"
        );
        self.client
            .query(&query, &[&attendees])
            .await?
            .iter()
            .map(appointment_from_row)
            .collect()
    }

    async fn insert_prescription(&self, prescription: NewPrescription) -> Result<Prescription> {
        let id = self
            .client
            .insert_returning_id(
                "prescription",
                "INSERT INTO prescriptions (patient_id, doctor_id, name, issue_date, \
                 expiration_date, refills, description) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
                &[
                    &raw_id(prescription.patient_id),
                    &raw_id(prescription.doctor_id),
                    &prescription.name,
                    &prescription.issue_date,
                    &prescription.expiration_date,
                    &prescription.refills,
                    &prescription.description,
                ],
            )
            .await?;
        Ok(prescription.with_id(PrescriptionId::new(id)))
    }

    async fn list_prescriptions(&self) -> Result<Vec<Prescription>> {
        let query = format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions ORDER BY id");
        self.client
            .query(&query, &[])
            .await?
            .iter()
            .map(prescription_from_row)
            .collect()
    }

    async fn insert_test_result(&self, result: NewTestResult) -> Result<TestResult> {
        let id = self
            .client
            .insert_returning_id(
                "test result",
                "INSERT INTO test_results (patient_id, doctor_id, test_date, test_type, \
                 release_date, description, comment, is_released) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
                &[
                    &raw_id(result.patient_id),
                    &raw_id(result.doctor_id),
                    &result.test_date,
                    &result.test_type,
                    &result.release_date,
                    &result.description,
                    &result.comment,
                    &result.is_released,
                ],
            )
            .await?;
        Ok(result.with_id(TestResultId::new(id)))
    }

    async fn list_test_results(&self) -> Result<Vec<TestResult>> {
        let query = format!("SELECT {TEST_RESULT_COLUMNS} FROM test_results ORDER BY id");
        self.client
            .query(&query, &[])
            .await?
            .iter()
            .map(test_result_from_row)
            .collect()
    }

    async fn insert_log_entry(&self, entry: NewLogEntry) -> Result<LogEntry> {
        let id = self
            .client
            .insert_returning_id(
                "log entry",
                "INSERT INTO log_entries (logged_at, level, message, user_id, request_method, \
                 request_secure, request_addr, hospital_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
                &[
                    &entry.timestamp,
                    &entry.level.as_str(),
                    &entry.message,
                    &raw_id(entry.user_id),
                    &entry.request_method,
                    &entry.request_secure,
                    &entry.request_addr,
                    &raw_id(entry.hospital_id),
                ],
            )
            .await?;
        Ok(entry.with_id(LogEntryId::new(id)))
    }

    async fn list_log_entries(&self) -> Result<Vec<LogEntry>> {
        let query = format!("SELECT {LOG_ENTRY_COLUMNS} FROM log_entries ORDER BY id");
        self.client
            .query(&query, &[])
            .await?
            .iter()
            .map(log_entry_from_row)
            .collect()
    }
}
