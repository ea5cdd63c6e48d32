//! RSSI Fingerprint Positioning
//!
//! Estimates a 2-D position from the signal strength of fixed wireless
//! anchors using a log-distance path-loss model and linearized least-squares
//! multilateration, and tracks which cells of a survey grid have been sampled.

pub mod core;
pub mod error;
pub mod algorithms;
pub mod state;
pub mod storage;
pub mod processing;
pub mod hardware;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{
    Anchor, DistanceEstimate, GridCell, Observation, Point2, PositionEstimate, RangeConstraint,
};
pub use crate::error::{Error, InputError, Result};
pub use crate::algorithms::{MultilaterationSolver, PathLossModel, PivotOrder, SolveReport};
pub use crate::algorithms::path_loss::estimate_distance;
pub use crate::state::{AnchorRegistry, GridProgressTracker};
pub use crate::state::progress::cell_of;
pub use crate::storage::{AnchorStore, FingerprintLog, FingerprintRecord, ProgressStore};
pub use crate::processing::RequestParser;
pub use crate::hardware::{MockScanner, SignalScanner};
pub use crate::utils::EngineConfig;
pub use crate::api::{
    CollectionSession, EstimateRequest, EstimateResult, PositioningEngine, SaveOutcome,
    StateSnapshot,
};
