//! Export command implementation
//!
//! This module implements the `export` command, which writes the configured
//! store's contents as a porter document.

use crate::core::porter::export_dataset;
use clap::Args;
use std::fs;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Pretty-print the document
    #[arg(long)]
    pub pretty: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let (config, store) = match super::open_store(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let dataset = match store.snapshot().await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read the record store");
                eprintln!("Failed to read the record store: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let export = export_dataset(&dataset);
        let json = if self.pretty || config.porter.pretty {
            export.export_json_pretty()?
        } else {
            export.export_json()?
        };

        let counts = dataset.counts();
        tracing::info!(
            hospitals = counts.hospitals,
            users = counts.admins + counts.doctors + counts.nurses + counts.patients,
            appointments = counts.appointments,
            "Export completed"
        );

        match &self.output {
            Some(path) => {
                if let Err(e) = fs::write(path, &json) {
                    eprintln!("Failed to write {path}: {e}");
                    return Ok(5);
                }
                println!("Exported {} records to {path}", counts.total());
            }
            None => println!("{json}"),
        }

        Ok(0)
    }
}
