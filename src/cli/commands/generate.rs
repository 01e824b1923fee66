//! Generate command implementation
//!
//! This module implements the `generate` command, which fills the configured
//! store with random records.

use crate::core::generate::Generator;
use clap::Args;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of records to create of each kind
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// Seed the generator for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(count = self.count, "Starting generate command");

        let (_config, calendar) = match super::open_calendar(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let mut generator = match self.seed {
            Some(seed) => Generator::seeded(calendar, seed),
            None => Generator::new(calendar),
        };

        match generator.run(self.count).await {
            Ok(report) => {
                println!("Generated random data:");
                println!("{report}");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Generation failed");
                eprintln!("Generation failed: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_generate_into_file_store() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("data.json");
        let config_path = dir.path().join("healthnet.toml");
        fs::write(
            &config_path,
            format!(
                "[storage]\nbackend = \"memory\"\npath = \"{}\"\n",
                store.to_string_lossy().replace('\\', "/")
            ),
        )
        .unwrap();

        let args = GenerateArgs {
            count: 2,
            seed: Some(3),
        };
        assert_eq!(args.execute(config_path.to_str().unwrap()).await.unwrap(), 0);
        assert!(store.exists());
    }
}
