//! Audit log domain model
//!
//! Every mutation the calendar performs is recorded as a [`LogEntry`] in the
//! store, next to the `tracing` event emitted for operators.

use super::ids::{HospitalId, LogEntryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of an audit log entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "Info",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Unknown log level '{other}'")),
        }
    }
}

/// A persisted audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub request_method: String,
    #[serde(default)]
    pub request_secure: bool,
    #[serde(default)]
    pub request_addr: String,
    pub hospital_id: Option<HospitalId>,
}

impl LogEntry {
    /// `<timestamp> [<Level>] <message>`
    pub fn description(&self) -> String {
        format!(
            "{} [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// An audit log entry that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub user_id: Option<UserId>,
    pub request_method: String,
    pub request_secure: bool,
    pub request_addr: String,
    pub hospital_id: Option<HospitalId>,
}

impl NewLogEntry {
    /// An entry stamped with the current time and no request context
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            user_id: None,
            request_method: String::new(),
            request_secure: false,
            request_addr: String::new(),
            hospital_id: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::now(LogLevel::Info, message)
    }

    pub fn user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn hospital(mut self, hospital_id: Option<HospitalId>) -> Self {
        self.hospital_id = hospital_id;
        self
    }

    /// Attaches the identifier assigned by the store
    pub fn with_id(self, id: LogEntryId) -> LogEntry {
        LogEntry {
            id,
            timestamp: self.timestamp,
            level: self.level,
            message: self.message,
            user_id: self.user_id,
            request_method: self.request_method,
            request_secure: self.request_secure,
            request_addr: self.request_addr,
            hospital_id: self.hospital_id,
        }
    }
}
