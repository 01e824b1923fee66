//! Error context extension trait
//!
//! Adds `.context()` and `.with_context()` to any `Result` whose error converts
//! into [`HealthNetError`], so library code can say what it was doing when a
//! lower layer failed without giving up the typed error.
//!
//! # Examples
//!
//! ```rust
//! use healthnet::domain::Result;
//! use healthnet::domain::context::ResultExt;
//!
//! fn read_document(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read document {}", path))
//! }
//! ```

use crate::domain::errors::HealthNetError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context computed only when an error occurs
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<HealthNetError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// Configuration and not-found errors keep their variant so callers can still
// map them to exit codes.
fn wrap(error: HealthNetError, context: impl std::fmt::Display) -> HealthNetError {
    match error {
        HealthNetError::Configuration(message) => {
            HealthNetError::Configuration(format!("{context}: {message}"))
        }
        HealthNetError::NotFound(message) => {
            HealthNetError::NotFound(format!("{context}: {message}"))
        }
        other => HealthNetError::Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StorageError;

    #[test]
    fn test_context_keeps_configuration_variant() {
        let result: Result<()> = Err(HealthNetError::Configuration("Invalid config".to_string()));
        let err = result.context("Failed to load healthnet.toml").unwrap_err();

        assert!(matches!(err, HealthNetError::Configuration(_)));
        assert!(err.to_string().contains("Failed to load healthnet.toml"));
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_with_context_is_lazy() {
        let called = std::sync::atomic::AtomicBool::new(false);
        let result: Result<i32> = Ok(42);
        let value = result
            .with_context(|| {
                called.store(true, std::sync::atomic::Ordering::SeqCst);
                "never"
            })
            .unwrap();

        assert_eq!(value, 42);
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_storage_error_with_context() {
        let result: Result<()> = Err(StorageError::QueryFailed("timeout".to_string()).into());
        let err = result.context("Failed to snapshot store").unwrap_err();
        assert!(matches!(err, HealthNetError::Other(_)));
        assert!(err.to_string().contains("Failed to snapshot store"));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_io_error_with_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = Err::<(), _>(io_error)
            .context("Failed to read export.json")
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read export.json"));
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_context_chaining() {
        let result: Result<()> = Err(HealthNetError::NotFound("appointment 4".to_string()));
        let err = result
            .context("Failed to load appointment")
            .context("Failed to update calendar")
            .unwrap_err();
        assert!(matches!(err, HealthNetError::NotFound(_)));
        assert!(err.to_string().contains("Failed to update calendar"));
        assert!(err.to_string().contains("appointment 4"));
    }
}
