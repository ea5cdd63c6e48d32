//! Core types and constants for the RSSI positioning engine

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
