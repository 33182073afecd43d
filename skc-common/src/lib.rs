//! # SKC Common Library
//!
//! Shared code for the SKC player client crates:
//! - Error type
//! - Bootstrap configuration loading and data folder resolution
//! - Durable key-value store
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod kv_store;
pub mod time;

pub use error::{Error, Result};
pub use kv_store::{JsonFileStore, KeyValueStore, MemoryStore};
