//! Logging and observability
//!
//! Structured logging through `tracing`, with a stderr console layer and an
//! optional rotated JSON file layer.
//!
//! # Example
//!
//! ```no_run
//! use healthnet::logging::init_logging;
//! use healthnet::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default())
//!     .expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a record the importer skipped
///
/// # Example
///
/// ```no_run
/// use healthnet::log_import_skip;
///
/// log_import_skip!("patients", 1, "Invalid date 'soon'");
/// ```
#[macro_export]
macro_rules! log_import_skip {
    ($kind:expr, $index:expr, $reason:expr) => {
        tracing::warn!(
            kind = $kind,
            index = $index,
            reason = %$reason,
            "Skipping imported record"
        );
    };
}

/// Log a booking the calendar refused
///
/// # Example
///
/// ```no_run
/// use healthnet::log_booking_rejected;
///
/// log_booking_rejected!("Checkup", "There was a conflict");
/// ```
#[macro_export]
macro_rules! log_booking_rejected {
    ($name:expr, $reason:expr) => {
        tracing::info!(
            appointment = %$name,
            reason = %$reason,
            "Booking rejected"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use healthnet::log_error_with_context;
/// use healthnet::domain::HealthNetError;
///
/// let error = HealthNetError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
