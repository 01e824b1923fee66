//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod appointment;
pub mod export;
pub mod generate;
pub mod import;
pub mod init;
pub mod status;
pub mod validate;

use crate::adapters::store::factory::create_record_store;
use crate::adapters::store::RecordStore;
use crate::config::{load_config, HealthNetConfig};
use crate::core::calendar::Calendar;
use crate::domain::HealthNetError;
use std::sync::Arc;

/// Load the configuration and open the record store it selects
///
/// On failure the error is printed and the exit code to return is given
/// back instead: 2 for configuration problems, 4 when the store can't be
/// opened.
pub(crate) async fn open_store(
    config_path: &str,
) -> Result<(HealthNetConfig, Arc<dyn RecordStore>), i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            crate::log_error_with_context!(&e, "Failed to load configuration");
            eprintln!("Failed to load configuration: {e}");
            return Err(2); // Configuration error exit code
        }
    };

    match create_record_store(&config).await {
        Ok(store) => Ok((config, store)),
        Err(e @ HealthNetError::Configuration(_)) => {
            crate::log_error_with_context!(&e, "Invalid store configuration");
            eprintln!("Invalid store configuration: {e}");
            Err(2)
        }
        Err(e) => {
            crate::log_error_with_context!(&e, "Failed to open record store");
            eprintln!("Failed to open record store: {e}");
            Err(4) // Connection error exit code
        }
    }
}

/// Like [`open_store`], wrapped in a calendar engine
pub(crate) async fn open_calendar(
    config_path: &str,
) -> Result<(HealthNetConfig, Arc<Calendar>), i32> {
    let (config, store) = open_store(config_path).await?;
    Ok((config, Arc::new(Calendar::new(store))))
}
