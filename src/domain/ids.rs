//! Domain identifier types
//!
//! This module provides newtype wrappers for the persistent identifiers of every
//! HealthNet entity. Each store assigns these; the porter never carries them across
//! instances (it replaces them with document-local indices).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw persistent identifier
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| format!("Invalid {} '{}': {}", $label, s, e))
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

record_id!(
    /// Identifier of a hospital
    HospitalId,
    "hospital id"
);

record_id!(
    /// Identifier of a user of any role
    ///
    /// Administrators, doctors, nurses and patients share one identity space, so an
    /// appointment's attendee set is a set of `UserId`s regardless of role.
    ///
    /// # Examples
    ///
    /// ```
    /// use healthnet::domain::ids::UserId;
    ///
    /// let id: UserId = "42".parse().unwrap();
    /// assert_eq!(id.get(), 42);
    /// ```
    UserId,
    "user id"
);

record_id!(
    /// Identifier of an appointment
    AppointmentId,
    "appointment id"
);

record_id!(
    /// Identifier of a prescription
    PrescriptionId,
    "prescription id"
);

record_id!(
    /// Identifier of a test result
    TestResultId,
    "test result id"
);

record_id!(
    /// Identifier of an audit log entry
    LogEntryId,
    "log entry id"
);
