//! Hospital domain model

use super::ids::HospitalId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address shared by hospitals and patients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line_1: String,
    #[serde(default)]
    pub line_2: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

impl Address {
    /// Builds an address holding a single free-form line
    ///
    /// Imported documents carry addresses as one string, so the whole value
    /// lands in `line_1`.
    pub fn single_line(line: impl Into<String>) -> Self {
        Self {
            line_1: line.into(),
            ..Self::default()
        }
    }

    /// Whether every component is empty
    pub fn is_empty(&self) -> bool {
        self.line_1.is_empty()
            && self.line_2.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.zipcode.is_empty()
    }
}

impl fmt::Display for Address {
    /// Formats as `line_1[ line_2], city, state zipcode`
    ///
    /// A single-line address (city, state and zipcode empty) prints as just its
    /// first line so that an imported address survives a second export unchanged.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.city.is_empty() && self.state.is_empty() && self.zipcode.is_empty() {
            return write!(f, "{}", self.line_1);
        }
        if self.line_2.is_empty() {
            write!(f, "{}", self.line_1)?;
        } else {
            write!(f, "{} {}", self.line_1, self.line_2)?;
        }
        write!(f, ", {}, {} {}", self.city, self.state, self.zipcode)
    }
}

/// A hospital
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub address: Address,
}

impl fmt::Display for Hospital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.city.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({}, {})", self.name, self.address.city, self.address.state)
        }
    }
}

/// A hospital that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHospital {
    pub name: String,
    pub address: Address,
}

impl NewHospital {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }

    /// Attaches the identifier assigned by the store
    pub fn with_id(self, id: HospitalId) -> Hospital {
        Hospital {
            id,
            name: self.name,
            address: self.address,
        }
    }
}
