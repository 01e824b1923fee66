//! Appointment scheduling
//!
//! [`Calendar`] books, edits and removes appointments through a
//! [`crate::adapters::store::RecordStore`], refusing any change that would
//! double-book an attendee. The overlap predicate lives in [`conflict`].

pub mod conflict;
pub mod engine;
pub mod feed;

pub use conflict::{conflicts_with, find_conflict, overlaps};
pub use engine::{Booking, Calendar, CONFLICT_REASON, INVALID_INTERVAL_REASON, NO_ATTENDEES_REASON};
pub use feed::FeedEvent;
