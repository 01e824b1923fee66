//! PostgreSQL record store
//!
//! This module provides the PostgreSQL backend: a pooled client, row mapping
//! and the [`RecordStore`](crate::adapters::store::RecordStore) implementation.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLStore;
pub use client::PostgreSQLClient;
