//! Calendar engine
//!
//! Creates, updates and removes appointments while keeping every attendee's
//! schedule free of overlaps.

use super::conflict::find_conflict;
use crate::adapters::store::RecordStore;
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, HealthNetError, NewAppointment, NewLogEntry,
    Result, UserId,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CONFLICT_REASON: &str = "Appointment could not be created because there was a conflict.";
pub const INVALID_INTERVAL_REASON: &str = "Appointment must end after it starts.";
pub const NO_ATTENDEES_REASON: &str = "Appointment must have at least one attendee.";

/// Outcome of a calendar mutation
///
/// A refused booking is an expected outcome, not an error; storage failures
/// surface as `Err` from the engine instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Booking {
    /// The appointment as stored
    Booked(Appointment),
    /// Nothing was written
    Rejected { reason: String },
}

impl Booking {
    pub fn is_booked(&self) -> bool {
        matches!(self, Booking::Booked(_))
    }

    pub fn appointment(&self) -> Option<&Appointment> {
        match self {
            Booking::Booked(appointment) => Some(appointment),
            Booking::Rejected { .. } => None,
        }
    }

    pub fn into_appointment(self) -> Option<Appointment> {
        match self {
            Booking::Booked(appointment) => Some(appointment),
            Booking::Rejected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Booking::Booked(_) => None,
            Booking::Rejected { reason } => Some(reason),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Booking::Rejected {
            reason: reason.into(),
        }
    }
}

/// Appointment scheduler over a record store
///
/// Check-then-write sequences are serialized through an async mutex, so two
/// bookings made through the same `Calendar` can never both pass the conflict
/// check. Separate processes sharing one database are not coordinated.
pub struct Calendar {
    store: Arc<dyn RecordStore>,
    write_lock: Mutex<()>,
}

impl Calendar {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Whether booking `attendees` over `[start, end]` would conflict
    ///
    /// `ignore` excludes one appointment from the check, typically the one
    /// being edited.
    pub async fn has_conflict(
        &self,
        attendees: &BTreeSet<UserId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        ignore: Option<AppointmentId>,
    ) -> Result<bool> {
        Ok(self.find_conflict(attendees, start, end, ignore).await?.is_some())
    }

    /// The first stored appointment that blocks the booking, if any
    pub async fn find_conflict(
        &self,
        attendees: &BTreeSet<UserId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        ignore: Option<AppointmentId>,
    ) -> Result<Option<Appointment>> {
        if attendees.is_empty() {
            return Ok(None);
        }
        let candidates = self.store.appointments_for_attendees(attendees).await?;
        Ok(find_conflict(&candidates, attendees, start, end, ignore).cloned())
    }

    /// Whether a stored appointment overlaps another one sharing an attendee
    pub async fn conflicts_with_existing(&self, appointment: &Appointment) -> Result<bool> {
        self.has_conflict(
            &appointment.attendees,
            appointment.start,
            appointment.end,
            Some(appointment.id),
        )
        .await
    }

    /// Book a new appointment
    ///
    /// The conflict check runs before anything is written; a conflicting or
    /// malformed request is rejected and the store is left untouched.
    pub async fn create_appointment(&self, request: NewAppointment) -> Result<Booking> {
        if let Some(reason) = validate(&request.attendees, request.start, request.end) {
            crate::log_booking_rejected!(request.name, reason);
            return Ok(Booking::rejected(reason));
        }

        let _guard = self.write_lock.lock().await;

        if let Some(existing) = self
            .find_conflict(&request.attendees, request.start, request.end, None)
            .await?
        {
            tracing::debug!(conflicting_id = %existing.id, "Conflicting appointment found");
            crate::log_booking_rejected!(request.name, CONFLICT_REASON);
            return Ok(Booking::rejected(CONFLICT_REASON));
        }

        let creator = request.creator;
        let appointment = self.store.insert_appointment(request).await?;
        self.audit(
            format!("Created appointment with pk '{}'", appointment.id),
            creator,
        )
        .await;

        tracing::info!(
            appointment_id = %appointment.id,
            attendees = appointment.attendees.len(),
            "Appointment created"
        );
        Ok(Booking::Booked(appointment))
    }

    /// Apply a partial update to an appointment
    ///
    /// The patched appointment is re-checked against every other appointment
    /// of its attendees; a conflicting edit is rejected and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no appointment has this id.
    pub async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Booking> {
        let _guard = self.write_lock.lock().await;

        let current = self.require(id).await?;
        let patched = patch.apply_to(&current);

        if let Some(reason) = validate(&patched.attendees, patched.start, patched.end) {
            crate::log_booking_rejected!(patched.name, reason);
            return Ok(Booking::rejected(reason));
        }

        if self
            .find_conflict(&patched.attendees, patched.start, patched.end, Some(id))
            .await?
            .is_some()
        {
            crate::log_booking_rejected!(patched.name, CONFLICT_REASON);
            return Ok(Booking::rejected(CONFLICT_REASON));
        }

        if patched != current {
            self.store.update_appointment(&patched).await?;
        }
        self.audit(format!("Updated appointment with pk '{}'", id), None)
            .await;

        tracing::info!(appointment_id = %id, "Appointment updated");
        Ok(Booking::Booked(patched))
    }

    /// Delete an appointment, returning what was removed
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no appointment has this id.
    pub async fn remove_appointment(&self, id: AppointmentId) -> Result<Appointment> {
        let _guard = self.write_lock.lock().await;

        let appointment = self.require(id).await?;
        if !self.store.delete_appointment(id).await? {
            return Err(HealthNetError::NotFound(format!("appointment {id}")));
        }
        self.audit(
            format!(
                "Deleted appointment named '{}' with pk '{}'",
                appointment.name, id
            ),
            None,
        )
        .await;

        tracing::info!(appointment_id = %id, "Appointment removed");
        Ok(appointment)
    }

    async fn require(&self, id: AppointmentId) -> Result<Appointment> {
        self.store
            .get_appointment(id)
            .await?
            .ok_or_else(|| HealthNetError::NotFound(format!("appointment {id}")))
    }

    /// Record a change in the audit log
    ///
    /// The appointment change is already committed, so a failed audit write
    /// is logged and does not fail the operation.
    async fn audit(&self, message: String, user: Option<UserId>) {
        if let Err(e) = self
            .store
            .insert_log_entry(NewLogEntry::info(message).user(user))
            .await
        {
            crate::log_error_with_context!(&e, "Failed to write appointment audit entry");
        }
    }
}

fn validate(
    attendees: &BTreeSet<UserId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&'static str> {
    if start >= end {
        Some(INVALID_INTERVAL_REASON)
    } else if attendees.is_empty() {
        Some(NO_ATTENDEES_REASON)
    } else {
        None
    }
}
