//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for HealthNet using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// HealthNet - appointment scheduling and instance data porting
#[derive(Parser, Debug)]
#[command(name = "healthnet")]
#[command(version, about, long_about = None)]
#[command(author = "HealthNet Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "healthnet.toml", env = "HEALTHNET_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HEALTHNET_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the store as a porter document
    Export(commands::export::ExportArgs),

    /// Import a porter document into the store
    Import(commands::import::ImportArgs),

    /// Book, change, cancel and list appointments
    Appointment(commands::appointment::AppointmentArgs),

    /// Fill the store with random records
    Generate(commands::generate::GenerateArgs),

    /// Show what the store holds
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
