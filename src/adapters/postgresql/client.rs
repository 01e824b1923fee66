//! PostgreSQL client implementation
//!
//! Wraps a `deadpool-postgres` pool and applies the configured statement
//! timeout to every checked-out connection.

use crate::config::{redact_credentials, PostgreSQLConfig};
use crate::domain::{HealthNetError, Result, StorageError};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

const INITIAL_SCHEMA: &str = include_str!("../../../migrations/001_initial_schema.sql");

/// PostgreSQL client for HealthNet
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool connects lazily; call [`PostgreSQLClient::test_connection`] to
    /// verify the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the pool cannot
    /// be built.
    pub fn new(config: PostgreSQLConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_str()
            .parse()
            .map_err(|e| {
                HealthNetError::Configuration(format!(
                    "Invalid PostgreSQL connection string: {}",
                    e
                ))
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .build()
            .map_err(|e| {
                StorageError::ConnectionFailed(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| StorageError::ConnectionFailed(format!("Connection test failed: {}", e)))?;

        tracing::info!(server = %self.connection_string_safe(), "PostgreSQL connection test successful");
        Ok(())
    }

    /// Create tables and indexes if they don't exist
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;
        client
            .batch_execute(INITIAL_SCHEMA)
            .await
            .map_err(|e| StorageError::SchemaFailed(e.to_string()))?;

        tracing::info!("PostgreSQL schema initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    pub async fn get_connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(|e| {
            StorageError::ConnectionFailed(format!("Failed to get connection from pool: {}", e))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.batch_execute(&timeout_query).await.map_err(|e| {
            StorageError::QueryFailed(format!("Failed to set statement timeout: {}", e))
        })?;

        Ok(client)
    }

    /// Execute a query and return rows
    pub async fn query(&self, query: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;
        client
            .query(query, params)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()).into())
    }

    /// Execute a query expected to return at most one row
    pub async fn query_opt(
        &self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>> {
        let client = self.get_connection().await?;
        client
            .query_opt(query, params)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()).into())
    }

    /// Execute an INSERT ... RETURNING id
    pub async fn insert_returning_id(
        &self,
        kind: &'static str,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<i64> {
        let client = self.get_connection().await?;
        let row = client
            .query_one(statement, params)
            .await
            .map_err(|e| StorageError::InsertFailed {
                kind,
                message: e.to_string(),
            })?;
        row.try_get(0).map_err(|e| {
            StorageError::CorruptRecord(format!("{kind} insert returned no id: {e}")).into()
        })
    }

    /// Execute a statement and return the number of affected rows
    pub async fn execute(&self, statement: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64> {
        let client = self.get_connection().await?;
        client
            .execute(statement, params)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()).into())
    }

    /// The connection string with credentials redacted
    pub fn connection_string_safe(&self) -> String {
        redact_credentials(self.config.connection_string.expose_secret().as_str())
    }

    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}
