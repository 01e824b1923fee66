//! Record store abstraction layer
//!
//! This module provides a trait-based abstraction over entity storage, allowing
//! HealthNet to run against an in-memory store or PostgreSQL.

pub mod factory;
pub mod traits;

pub use factory::create_record_store;
pub use traits::{Dataset, DatasetCounts, RecordStore};
