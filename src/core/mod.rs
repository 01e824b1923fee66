//! Core business logic for HealthNet.
//!
//! # Modules
//!
//! - [`calendar`] - Appointment booking with conflict detection
//! - [`porter`] - JSON export and import of a hospital's entity graph
//! - [`generate`] - Random data for demos and load testing
//!
//! # Example
//!
//! ```rust,no_run
//! use healthnet::adapters::memory::MemoryStore;
//! use healthnet::core::calendar::Calendar;
//! use healthnet::core::porter::export_dataset;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let calendar = Calendar::new(Arc::new(MemoryStore::new()));
//!
//! // Export everything the store holds
//! let dataset = calendar.store().snapshot().await?;
//! let json = export_dataset(&dataset).export_json()?;
//! println!("{json}");
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod generate;
pub mod porter;
