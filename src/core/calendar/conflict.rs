//! Appointment conflict detection
//!
//! Two appointments conflict when they share an attendee and their time
//! intervals overlap. Bounds are exclusive, so an appointment ending at 11:00
//! does not conflict with one starting at 11:00.

use crate::domain::{Appointment, AppointmentId, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Whether `existing` overlaps the interval `[start, end]`
///
/// The three clauses are: `existing` starts inside the interval, ends inside
/// it, or encloses it.
pub fn overlaps(existing: &Appointment, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    (existing.start > start && existing.start < end)
        || (existing.end > start && existing.start < end)
        || (existing.start < start && existing.end > end)
}

/// Whether `existing` blocks a booking of `attendees` over `[start, end]`
pub fn conflicts_with(
    existing: &Appointment,
    attendees: &BTreeSet<UserId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    ignore: Option<AppointmentId>,
) -> bool {
    if ignore == Some(existing.id) {
        return false;
    }
    existing.shares_attendee(attendees) && overlaps(existing, start, end)
}

/// First appointment in `candidates` that blocks the booking
pub fn find_conflict<'a, I>(
    candidates: I,
    attendees: &BTreeSet<UserId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    ignore: Option<AppointmentId>,
) -> Option<&'a Appointment>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    candidates
        .into_iter()
        .find(|existing| conflicts_with(existing, attendees, start, end, ignore))
}
