//! Record store adapters for HealthNet.
//!
//! - [`store`] - the [`RecordStore`](store::RecordStore) trait, dataset snapshot and factory
//! - [`memory`] - in-memory store with optional JSON file persistence
//! - [`postgresql`] - PostgreSQL store on a connection pool
//!
//! # Example
//!
//! ```rust
//! use healthnet::adapters::memory::MemoryStore;
//! use healthnet::adapters::store::RecordStore;
//! use healthnet::domain::{Address, NewHospital};
//!
//! # async fn example() -> healthnet::domain::Result<()> {
//! let store = MemoryStore::new();
//! let hospital = store
//!     .insert_hospital(NewHospital::new("Strong Memorial", Address::default()))
//!     .await?;
//! assert_eq!(hospital.id.get(), 1);
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod postgresql;
pub mod store;
