//! Configuration

pub mod config;

pub use config::{EngineConfig, GridConfig, StorageConfig};
