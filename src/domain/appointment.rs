//! Appointment domain model

use super::ids::{AppointmentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A scheduled appointment
///
/// The attendee set is role-agnostic: doctors, nurses and patients are all
/// attendees. Two appointments that share an attendee never overlap in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees: BTreeSet<UserId>,
    pub creator: Option<UserId>,
}

impl Appointment {
    /// Whether `user` attends this appointment
    pub fn is_attended_by(&self, user: UserId) -> bool {
        self.attendees.contains(&user)
    }

    /// Whether this appointment shares at least one attendee with `others`
    pub fn shares_attendee(&self, others: &BTreeSet<UserId>) -> bool {
        !self.attendees.is_disjoint(others)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// An appointment that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub name: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees: BTreeSet<UserId>,
    pub creator: Option<UserId>,
}

impl NewAppointment {
    pub fn new(
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        attendees: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            location: String::new(),
            start,
            end,
            attendees: attendees.into_iter().collect(),
            creator: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn creator(mut self, creator: Option<UserId>) -> Self {
        self.creator = creator;
        self
    }

    /// Attaches the identifier assigned by the store
    pub fn with_id(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            name: self.name,
            description: self.description,
            location: self.location,
            start: self.start,
            end: self.end,
            attendees: self.attendees,
            creator: self.creator,
        }
    }
}

/// Partial update of an appointment; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub attendees: Option<BTreeSet<UserId>>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.attendees.is_none()
    }

    /// Returns a copy of `appointment` with the patch applied
    pub fn apply_to(&self, appointment: &Appointment) -> Appointment {
        let mut patched = appointment.clone();
        if let Some(name) = &self.name {
            patched.name = name.clone();
        }
        if let Some(description) = &self.description {
            patched.description = description.clone();
        }
        if let Some(location) = &self.location {
            patched.location = location.clone();
        }
        if let Some(start) = self.start {
            patched.start = start;
        }
        if let Some(end) = self.end {
            patched.end = end;
        }
        if let Some(attendees) = &self.attendees {
            patched.attendees = attendees.clone();
        }
        patched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
    }

    fn checkup() -> Appointment {
        NewAppointment::new("Checkup", at(10, 0), at(11, 0), [UserId::new(1), UserId::new(2)])
            .location("Room 4")
            .creator(Some(UserId::new(1)))
            .with_id(AppointmentId::new(1))
    }

    #[test]
    fn test_attendance() {
        let appointment = checkup();
        assert!(appointment.is_attended_by(UserId::new(2)));
        assert!(!appointment.is_attended_by(UserId::new(3)));
        assert_eq!(appointment.duration(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_shares_attendee() {
        let appointment = checkup();
        let others: BTreeSet<UserId> = [UserId::new(2), UserId::new(9)].into_iter().collect();
        assert!(appointment.shares_attendee(&others));
        assert!(!appointment.shares_attendee(&BTreeSet::new()));
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let appointment = checkup();
        let patch = AppointmentPatch {
            name: Some("Follow-up".to_string()),
            end: Some(at(11, 30)),
            ..Default::default()
        };
        let patched = patch.apply_to(&appointment);
        assert_eq!(patched.name, "Follow-up");
        assert_eq!(patched.end, at(11, 30));
        assert_eq!(patched.start, appointment.start);
        assert_eq!(patched.location, "Room 4");
        assert_eq!(patched.attendees, appointment.attendees);
    }

    #[test]
    fn test_empty_patch() {
        assert!(AppointmentPatch::default().is_empty());
        let patch = AppointmentPatch {
            location: Some(String::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
