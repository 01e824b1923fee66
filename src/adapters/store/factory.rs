//! Record store factory
//!
//! This module creates the record store selected by the configuration.

use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLStore};
use crate::adapters::store::RecordStore;
use crate::config::schema::{HealthNetConfig, StorageBackend};
use crate::domain::{HealthNetError, Result};
use std::sync::Arc;

/// Create a record store based on the configuration
///
/// The store's schema is ensured before it is returned.
///
/// # Errors
///
/// Returns a configuration error if the selected backend's section is
/// missing, and a storage error if the backend cannot be opened.
pub async fn create_record_store(config: &HealthNetConfig) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.storage.backend {
        StorageBackend::Memory => {
            if config.storage.path.is_empty() {
                tracing::info!("Creating in-memory record store");
                Arc::new(MemoryStore::new())
            } else {
                tracing::info!(path = %config.storage.path, "Opening file-backed memory store");
                Arc::new(MemoryStore::open(&config.storage.path).await?)
            }
        }
        StorageBackend::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                HealthNetError::Configuration(
                    "postgresql configuration is required when storage.backend = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL record store");
            let client = PostgreSQLClient::new(pg_config.clone())?;
            Arc::new(PostgreSQLStore::new(client))
        }
    };

    store.test_connection().await?;
    store.ensure_schema().await?;
    Ok(store)
}
