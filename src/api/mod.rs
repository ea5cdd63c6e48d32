//! Estimation API
//!
//! `PositioningEngine` turns readings into ranges and a position without
//! touching disk. `CollectionSession` adds the durable side effects of a save:
//! the fingerprint log, the visited-cell store and the anchor file.

pub mod engine;
pub mod session;
pub mod types;

pub use engine::PositioningEngine;
pub use session::CollectionSession;
pub use types::{EstimateRequest, EstimateResult, SaveOutcome, StateSnapshot};
