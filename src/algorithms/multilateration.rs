//! Linearized least-squares multilateration in 2-D.
//!
//! The first constraint is the pivot `(x1, y1, r1)`. Subtracting every other
//! circle equation from the pivot's gives rows
//!
//! `2(xi - x1) x + 2(yi - y1) y = r1² - ri² + xi² + yi² - x1² - y1²`
//!
//! which are stacked into `A p = b` and solved by SVD. The result depends on
//! which constraint is the pivot, so input order matters for near-degenerate
//! layouts unless `PivotOrder::ByIdentifier` is selected.

use crate::core::{Point2, PositionEstimate, RangeConstraint, MIN_ANCHORS};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// How the pivot constraint is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotOrder {
    /// First constraint as supplied by the caller
    #[default]
    AsObserved,
    /// Constraints sorted by anchor identifier before linearizing
    ByIdentifier,
}

/// Solver parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultilaterationSolver {
    /// Minimum usable constraints for a fix
    pub min_anchors: usize,
    /// Relative singular-value threshold below which `A` is treated as rank-deficient
    pub singular_value_tolerance: f64,
    pub pivot_order: PivotOrder,
}

impl Default for MultilaterationSolver {
    fn default() -> Self {
        Self {
            min_anchors: MIN_ANCHORS,
            singular_value_tolerance: 1e-9,
            pivot_order: PivotOrder::AsObserved,
        }
    }
}

/// Estimate plus the numbers behind it
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub estimate: PositionEstimate,
    /// Constraints that entered the system (finite ranges only)
    pub anchors_used: usize,
    /// Ratio of largest to smallest singular value of `A`; infinite when singular
    pub condition_number: f64,
    /// RMS of `|p - anchor| - range` over the used constraints, if determined
    pub rms_residual_m: Option<f64>,
}

impl SolveReport {
    fn undetermined(anchors_used: usize, condition_number: f64) -> Self {
        Self {
            estimate: PositionEstimate::Undetermined,
            anchors_used,
            condition_number,
            rms_residual_m: None,
        }
    }
}

impl MultilaterationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pivot_order(mut self, pivot_order: PivotOrder) -> Self {
        self.pivot_order = pivot_order;
        self
    }

    /// Best-fit position, or `Undetermined` for fewer than three usable
    /// constraints or singular geometry. Never fails.
    pub fn solve(&self, constraints: &[RangeConstraint]) -> PositionEstimate {
        self.solve_with_report(constraints).estimate
    }

    pub fn solve_with_report(&self, constraints: &[RangeConstraint]) -> SolveReport {
        let mut usable: Vec<&RangeConstraint> = constraints
            .iter()
            .filter(|c| c.distance_m.is_finite() && c.position.is_finite())
            .collect();

        let required = self.min_anchors.max(MIN_ANCHORS);
        if usable.len() < required {
            debug!(
                "{} usable anchors, {} required: position undetermined",
                usable.len(),
                required
            );
            return SolveReport::undetermined(usable.len(), f64::INFINITY);
        }

        if self.pivot_order == PivotOrder::ByIdentifier {
            usable.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        }

        let (a_mat, b_vec) = Self::linearize(&usable);

        let svd = a_mat.svd(true, true);
        let sigma_max = svd.singular_values.max();
        let sigma_min = svd.singular_values.min();
        let condition_number = if sigma_min > 0.0 {
            sigma_max / sigma_min
        } else {
            f64::INFINITY
        };

        if !(sigma_max > 0.0) || sigma_min <= self.singular_value_tolerance * sigma_max {
            warn!(
                "Anchor geometry is singular (condition number = {:.3e}); anchors may be collinear",
                condition_number
            );
            return SolveReport::undetermined(usable.len(), condition_number);
        }

        let solution = match svd.solve(&b_vec, self.singular_value_tolerance * sigma_max) {
            Ok(solution) => solution,
            Err(e) => {
                warn!("Least-squares solve failed: {}", e);
                return SolveReport::undetermined(usable.len(), condition_number);
            }
        };

        let position = Point2::new(solution[0], solution[1]);
        if !position.is_finite() {
            return SolveReport::undetermined(usable.len(), condition_number);
        }

        let rms_residual_m = Self::rms_residual(&usable, &position);
        debug!(
            "Solved ({:.3}, {:.3}) from {} anchors, condition number {:.2}, rms residual {:.3} m",
            position.x,
            position.y,
            usable.len(),
            condition_number,
            rms_residual_m
        );

        SolveReport {
            estimate: PositionEstimate::Determined(position),
            anchors_used: usable.len(),
            condition_number,
            rms_residual_m: Some(rms_residual_m),
        }
    }

    /// Pivot-subtracted linear system; one row per non-pivot constraint
    fn linearize(usable: &[&RangeConstraint]) -> (DMatrix<f64>, DVector<f64>) {
        let pivot = usable[0];
        let (x1, y1, r1) = (pivot.position.x, pivot.position.y, pivot.distance_m);
        let rows = usable.len() - 1;

        let mut a_mat = DMatrix::zeros(rows, 2);
        let mut b_vec = DVector::zeros(rows);

        for (row, c) in usable[1..].iter().enumerate() {
            let (xi, yi, ri) = (c.position.x, c.position.y, c.distance_m);
            a_mat[(row, 0)] = 2.0 * (xi - x1);
            a_mat[(row, 1)] = 2.0 * (yi - y1);
            b_vec[row] = r1.powi(2) - ri.powi(2) + xi.powi(2) + yi.powi(2)
                - x1.powi(2)
                - y1.powi(2);
        }

        (a_mat, b_vec)
    }

    fn rms_residual(usable: &[&RangeConstraint], position: &Point2) -> f64 {
        let sum_sq: f64 = usable
            .iter()
            .map(|c| (position.distance_to(&c.position) - c.distance_m).powi(2))
            .sum();
        (sum_sq / usable.len() as f64).sqrt()
    }
}
