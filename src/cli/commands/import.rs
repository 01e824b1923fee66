//! Import command implementation
//!
//! This module implements the `import` command, which loads a porter document
//! into the configured store.

use crate::core::porter::{bind_calendar, EntityKind, HealthNetImport};
use clap::Args;
use std::fs;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Porter document to import
    #[arg(short, long, value_name = "FILE")]
    pub file: String,

    /// Leave a section out of the import (repeatable)
    #[arg(long, value_name = "KIND")]
    pub skip: Vec<EntityKind>,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file, "Starting import command");

        let json = match fs::read_to_string(&self.file) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", self.file);
                return Ok(5); // Fatal error exit code
            }
        };

        let import = match HealthNetImport::from_json(&json) {
            Ok(i) => i,
            Err(e) => {
                tracing::error!(error = %e, "Document rejected");
                eprintln!("Invalid porter document: {e}");
                return Ok(5);
            }
        };

        let (_config, calendar) = match super::open_calendar(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let mut import = bind_calendar(import, calendar);
        for kind in &self.skip {
            tracing::info!(section = %kind, "Skipping section from CLI");
            import = import.without(*kind);
        }

        let summary = import.import_all().await;

        println!("Import of {}:", self.file);
        println!("{summary}");

        if summary.is_complete() {
            Ok(0)
        } else {
            Ok(1) // Partial success exit code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ImportArgs,
    }

    #[test]
    fn test_skip_parses_section_names() {
        let harness =
            Harness::parse_from(["import", "-f", "in.json", "--skip", "log-entries", "--skip", "tests"]);
        assert_eq!(harness.args.file, "in.json");
        assert_eq!(
            harness.args.skip,
            vec![EntityKind::LogEntries, EntityKind::Tests]
        );
    }

    #[test]
    fn test_unknown_skip_section_is_rejected() {
        let result = Harness::try_parse_from(["import", "-f", "in.json", "--skip", "wards"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_partial_import_exits_with_1() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("healthnet.toml");
        let document = dir.path().join("in.json");
        fs::write(&config_path, "[storage]\nbackend = \"memory\"\npath = \"\"\n").unwrap();
        fs::write(
            &document,
            r#"{"hospitals": [{"name": "Strong", "addr": "1 Main St"}, {"addr": 3}]}"#,
        )
        .unwrap();

        let args = ImportArgs {
            file: document.to_string_lossy().to_string(),
            skip: Vec::new(),
        };
        let code = args.execute(config_path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_fatal() {
        let args = ImportArgs {
            file: "/nonexistent/in.json".to_string(),
            skip: Vec::new(),
        };
        assert_eq!(args.execute("healthnet.toml").await.unwrap(), 5);
    }
}
