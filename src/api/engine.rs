//! Estimation pipeline: readings -> ranges -> usable anchors -> position.
//!
//! The engine holds no per-request state. The anchor registry and progress
//! tracker are shared handles, so one engine can serve concurrent callers.

use crate::algorithms::{MultilaterationSolver, PathLossModel};
use crate::api::types::{EstimateRequest, EstimateResult, StateSnapshot};
use crate::core::{Anchor, GridCell, Observation, SCANNER_NOT_FOUND_DBM};
use crate::hardware::scanner::{complete_readings, SignalScanner};
use crate::state::{AnchorRegistry, GridProgressTracker};
use crate::utils::config::EngineConfig;
use log::{debug, warn};
use std::sync::Arc;

pub struct PositioningEngine {
    model: PathLossModel,
    solver: MultilaterationSolver,
    anchors: Arc<AnchorRegistry>,
    progress: Arc<GridProgressTracker>,
}

impl PositioningEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_components(
            config.path_loss,
            config.solver,
            Arc::new(AnchorRegistry::new()),
            Arc::new(GridProgressTracker::new(config.grid.cell_size_m)),
        )
    }

    pub fn with_components(
        model: PathLossModel,
        solver: MultilaterationSolver,
        anchors: Arc<AnchorRegistry>,
        progress: Arc<GridProgressTracker>,
    ) -> Self {
        Self {
            model,
            solver,
            anchors,
            progress,
        }
    }

    pub fn model(&self) -> &PathLossModel {
        &self.model
    }

    pub fn anchors(&self) -> &Arc<AnchorRegistry> {
        &self.anchors
    }

    pub fn progress(&self) -> &Arc<GridProgressTracker> {
        &self.progress
    }

    pub fn set_anchors(&self, anchors: Vec<Anchor>) {
        self.anchors.set_anchors(anchors);
    }

    /// Ranges for every observation and the best-fit position.
    /// Unknown or unseen anchors are dropped from the solve silently.
    pub fn estimate(&self, request: &EstimateRequest) -> EstimateResult {
        let distances = self.model.estimate_all(&request.observations);
        let usable = self.anchors.usable_subset(&distances);
        debug!(
            "{} observations, {} usable anchors",
            request.observations.len(),
            usable.len()
        );

        let report = self.solver.solve_with_report(&usable);
        EstimateResult {
            distances,
            position: report.estimate,
            anchors_used: report.anchors_used,
            rms_residual_m: report.rms_residual_m,
        }
    }

    /// Scan for `identifiers` and return one observation per identifier in
    /// the same order. A failed scan reports every identifier as not found.
    pub fn observe<S: SignalScanner + ?Sized>(
        &self,
        scanner: &mut S,
        identifiers: &[String],
    ) -> Vec<Observation> {
        let readings = match scanner.scan(identifiers) {
            Ok(readings) => complete_readings(identifiers, readings),
            Err(e) => {
                warn!("Scan failed, reporting all anchors as not found: {}", e);
                identifiers
                    .iter()
                    .map(|id| (id.clone(), SCANNER_NOT_FOUND_DBM))
                    .collect()
            }
        };
        readings
            .into_iter()
            .map(|(identifier, strength)| Observation::new(identifier, strength))
            .collect()
    }

    /// Cell that would be marked for a sample taken at `(x, y)`
    pub fn cell_of(&self, x: f64, y: f64) -> GridCell {
        self.progress.cell_of(x, y)
    }

    pub fn state(&self) -> StateSnapshot {
        StateSnapshot {
            anchors: self.anchors.anchors(),
            completed: self.progress.snapshot(),
        }
    }
}
