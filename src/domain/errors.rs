//! Domain error types
//!
//! This module defines the error hierarchy for HealthNet. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main HealthNet error type
///
/// This is the primary error type used throughout the application.
/// A rejected booking is *not* an error; see [`crate::core::calendar::Booking`].
#[derive(Debug, Error)]
pub enum HealthNetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Import/export errors
    #[error("Porter error: {0}")]
    Porter(#[from] PorterError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Record store errors
///
/// Errors raised by a [`crate::adapters::store::RecordStore`] implementation.
/// These errors don't expose the underlying database driver types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to connect to the backing database
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Failed to create the schema
    #[error("Failed to initialize schema: {0}")]
    SchemaFailed(String),

    /// Failed to insert a record
    #[error("Failed to insert {kind}: {message}")]
    InsertFailed { kind: &'static str, message: String },

    /// Failed to update a record
    #[error("Failed to update {kind}: {message}")]
    UpdateFailed { kind: &'static str, message: String },

    /// Failed to delete a record
    #[error("Failed to delete {kind}: {message}")]
    DeleteFailed { kind: &'static str, message: String },

    /// Failed to query records
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row could not be mapped back to a domain type
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// Failed to load or save the store's backing file
    #[error("Failed to persist store: {0}")]
    PersistFailed(String),
}

/// Porter errors
///
/// Raised while reading or writing a HealthNet interchange document, and used to
/// describe why a single imported record was skipped.
#[derive(Debug, Error)]
pub enum PorterError {
    /// The document is not a JSON object with the expected arrays
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A single record could not be decoded
    #[error("Malformed {kind} record at index {index}: {message}")]
    MalformedRecord {
        kind: &'static str,
        index: usize,
        message: String,
    },

    /// A date or timestamp field could not be parsed
    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    /// The creation callback refused the record
    #[error("Failed to create {kind} record at index {index}: {message}")]
    CreateFailed {
        kind: &'static str,
        index: usize,
        message: String,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for HealthNetError {
    fn from(err: std::io::Error) -> Self {
        HealthNetError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for HealthNetError {
    fn from(err: serde_json::Error) -> Self {
        HealthNetError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for HealthNetError {
    fn from(err: toml::de::Error) -> Self {
        HealthNetError::Configuration(format!("TOML parse error: {err}"))
    }
}
