//! Status command implementation
//!
//! This module implements the `status` command for displaying what the
//! configured record store holds.

use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking store status");

        let (config, store) = match super::open_store(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let dataset = match store.snapshot().await {
            Ok(d) => d,
            Err(e) => {
                println!("❌ Failed to read the record store");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };
        let counts = dataset.counts();

        println!("📊 HealthNet Status");
        println!();
        println!("  Backend: {}", store.backend_name());
        if !config.storage.path.is_empty() && store.backend_name() == "memory" {
            println!("  File:    {}", config.storage.path);
        }
        println!();
        println!("{:<16} {:>8}", "Entity", "Count");
        println!("{}", "-".repeat(25));
        for (label, count) in [
            ("Hospitals", counts.hospitals),
            ("Administrators", counts.admins),
            ("Doctors", counts.doctors),
            ("Nurses", counts.nurses),
            ("Patients", counts.patients),
            ("Appointments", counts.appointments),
            ("Prescriptions", counts.prescriptions),
            ("Test results", counts.test_results),
            ("Log entries", counts.log_entries),
        ] {
            println!("{label:<16} {count:>8}");
        }
        println!("{}", "-".repeat(25));
        println!("{:<16} {:>8}", "Total", counts.total());
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
    async fn test_status_of_empty_store() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("healthnet.toml");
        fs::write(&config_path, "[storage]\npath = \"\"\n").unwrap();

        let code = StatusArgs {}
            .execute(config_path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_is_exit_code_2() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("healthnet.toml");
        fs::write(&config_path, "[application]\nlog_level = \"loud\"\n").unwrap();

        let code = StatusArgs {}
            .execute(config_path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
