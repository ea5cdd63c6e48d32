//! Durable stores: fingerprint log, progress set, anchor configuration

pub mod fingerprints;
pub mod progress_store;
pub mod anchor_store;

pub use fingerprints::{FingerprintLog, FingerprintRecord};
pub use progress_store::ProgressStore;
pub use anchor_store::AnchorStore;
