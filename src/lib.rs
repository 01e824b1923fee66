// HealthNet - Appointment scheduling and instance data porting
// Copyright (c) 2025 HealthNet Contributors
// Licensed under the MIT License

//! # HealthNet
//!
//! HealthNet keeps a hospital network's appointments free of double bookings
//! and moves its records between instances.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Scheduling** appointments with attendee-based conflict detection
//! - **Exporting** a store's entity graph as a self-contained JSON document
//! - **Importing** such a document into another instance, remapping every
//!   cross-reference to the ids the target assigns
//! - **Generating** random data for demos and load tests
//!
//! ## Architecture
//!
//! HealthNet follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (calendar, porter, generator)
//! - [`adapters`] - Record stores (in-memory, PostgreSQL)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthnet::adapters::store::factory::create_record_store;
//! use healthnet::config::load_config;
//! use healthnet::core::calendar::{Booking, Calendar};
//! use healthnet::domain::{NewAppointment, UserId};
//! use chrono::{TimeZone, Utc};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("healthnet.toml")?;
//!     let calendar = Calendar::new(create_record_store(&config).await?);
//!
//!     let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
//!     let end = Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap();
//!     let request = NewAppointment::new("Checkup", start, end, [UserId::new(1), UserId::new(2)]);
//!
//!     match calendar.create_appointment(request).await? {
//!         Booking::Booked(appointment) => println!("Booked {}", appointment.id),
//!         Booking::Rejected { reason } => println!("{reason}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Porting Data
//!
//! Records leave an instance with their references rewritten to document
//! positions, and come back in with the target's ids:
//!
//! ```rust,no_run
//! use healthnet::core::calendar::Calendar;
//! use healthnet::core::porter::{export_dataset, import_into};
//! use std::sync::Arc;
//!
//! # async fn example(source: &Calendar, target: Arc<Calendar>) -> healthnet::domain::Result<()> {
//! let json = export_dataset(&source.store().snapshot().await?).export_json()?;
//!
//! let summary = import_into(&json, target).await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error is
//! [`domain::HealthNetError`]. Booking conflicts are not errors: they come
//! back as [`core::calendar::Booking::Rejected`].
//!
//! ## Logging
//!
//! HealthNet uses structured logging with the `tracing` crate; see
//! [`logging::init_logging`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
