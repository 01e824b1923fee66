//! Date handling for porter documents
//!
//! Dates are written as `YYYY-MM-DD` and timestamps as
//! `YYYY-MM-DDTHH:MM:SS[.ffffff]+00:00`. Reading is lenient: any UTC offset
//! is discarded and the result is taken as UTC, fractional seconds are kept,
//! and a bare date is accepted wherever a timestamp is expected (midnight).

use crate::domain::PorterError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a document timestamp or date
///
/// # Errors
///
/// Returns [`PorterError::InvalidDate`] when neither form matches.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, PorterError> {
    let trimmed = value.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(strip_offset(trimmed), TIMESTAMP_FORMAT) {
        return Ok(parsed);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| PorterError::InvalidDate(value.to_string()))
}

/// Parse a document date, dropping any time of day
pub fn parse_date(value: &str) -> Result<NaiveDate, PorterError> {
    parse_timestamp(value).map(|parsed| parsed.date())
}

pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, PorterError> {
    parse_timestamp(value).map(|parsed| parsed.and_utc())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

// Drops a trailing `Z`, `+HH:MM` or `-HH:MM` from the time part.
fn strip_offset(value: &str) -> &str {
    let Some(time_start) = value.find('T') else {
        return value;
    };
    let (date, time) = value.split_at(time_start);
    let end = time
        .find(|c: char| c == '+' || c == '-' || c == 'Z')
        .unwrap_or(time.len());
    &value[..date.len() + end]
}

/// Serde adapter for `NaiveDate` fields
pub mod date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for nullable `NaiveDate` fields
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Serde adapter for UTC timestamp fields
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        timestamp: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(*timestamp))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_utc(&raw).map_err(serde::de::Error::custom)
    }
}
