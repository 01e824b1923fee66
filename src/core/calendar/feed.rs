//! Per-attendee calendar queries

use super::engine::Calendar;
use crate::domain::{Appointment, AppointmentId, Result, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// One event in an attendee's calendar feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEvent {
    pub id: AppointmentId,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&Appointment> for FeedEvent {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            title: appointment.name.clone(),
            description: appointment.description.clone(),
            start: appointment.start,
            end: appointment.end,
        }
    }
}

impl Calendar {
    /// Every appointment `attendee` is part of, ordered by start time
    pub async fn appointments_for_attendee(&self, attendee: UserId) -> Result<Vec<Appointment>> {
        let attendees = BTreeSet::from([attendee]);
        let mut appointments = self.store().appointments_for_attendees(&attendees).await?;
        appointments.sort_by_key(|apt| (apt.start, apt.id));
        Ok(appointments)
    }

    /// Appointments of `attendee` that start on `date` (UTC)
    pub async fn appointments_for_attendee_on(
        &self,
        attendee: UserId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .appointments_for_attendee(attendee)
            .await?
            .into_iter()
            .filter(|apt| apt.start.date_naive() == date)
            .collect())
    }

    /// Calendar feed for `attendee` as a JSON array of events
    pub async fn appointments_feed(&self, attendee: UserId) -> Result<serde_json::Value> {
        let events: Vec<FeedEvent> = self
            .appointments_for_attendee(attendee)
            .await?
            .iter()
            .map(FeedEvent::from)
            .collect();
        Ok(serde_json::to_value(events)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::NewAppointment;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    async fn seeded() -> Calendar {
        let calendar = Calendar::new(Arc::new(MemoryStore::new()));
        let bookings = [
            NewAppointment::new("Afternoon", at(1, 14), at(1, 15), [UserId::new(1)]),
            NewAppointment::new("Morning", at(1, 9), at(1, 10), [UserId::new(1), UserId::new(2)]),
            NewAppointment::new("Next day", at(2, 9), at(2, 10), [UserId::new(1)]),
            NewAppointment::new("Other", at(1, 9), at(1, 10), [UserId::new(3)]),
        ];
        for booking in bookings {
            assert!(calendar.create_appointment(booking).await.unwrap().is_booked());
        }
        calendar
    }

    #[tokio::test]
    async fn test_appointments_for_attendee_on_day() {
        let calendar = seeded().await;
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let names: Vec<String> = calendar
            .appointments_for_attendee_on(UserId::new(1), day)
            .await
            .unwrap()
            .into_iter()
            .map(|apt| apt.name)
            .collect();
        assert_eq!(names, vec!["Morning", "Afternoon"]);
    }

    #[tokio::test]
    async fn test_feed_shape() {
        let calendar = seeded().await;
        let feed = calendar.appointments_feed(UserId::new(2)).await.unwrap();

        let events = feed.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["title"], "Morning");
        assert_eq!(events[0]["start"], "2024-03-01T09:00:00Z");
        assert!(events[0]["id"].is_i64());
        assert!(events[0].get("description").is_some());
    }

    #[tokio::test]
    async fn test_feed_for_unknown_attendee_is_empty() {
        let calendar = seeded().await;
        let feed = calendar.appointments_feed(UserId::new(42)).await.unwrap();
        assert_eq!(feed, serde_json::json!([]));
    }
}
