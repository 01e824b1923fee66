//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the HealthNet configuration file.

use crate::config::{load_config, redact_credentials, StorageBackend};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);

        match config.storage.backend {
            StorageBackend::Memory => {
                println!("  Storage Backend: memory");
                if config.storage.path.is_empty() {
                    println!("  Storage File: (none, data is not persisted)");
                } else {
                    println!("  Storage File: {}", config.storage.path);
                }
            }
            StorageBackend::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    use secrecy::ExposeSecret;
                    println!("  Storage Backend: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        redact_credentials(pg_config.connection_string.expose_secret().as_str())
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
            }
        }

        println!("  Pretty Export: {}", config.porter.pretty);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("healthnet.toml");
        fs::write(&path, "[porter]\npretty = true\n").unwrap();
        assert_eq!(ValidateArgs {}.execute(path.to_str().unwrap()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_postgres_without_section_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("healthnet.toml");
        fs::write(&path, "[storage]\nbackend = \"postgresql\"\n").unwrap();
        assert_eq!(ValidateArgs {}.execute(path.to_str().unwrap()).await.unwrap(), 2);
    }
}
