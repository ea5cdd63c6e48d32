//! Log-distance path-loss model: signal strength to range.
//!
//! `d = 10 ^ ((P0 - rssi) / (10 * n))`, where `P0` is the strength expected at
//! 1 m and `n` the path-loss exponent. Readings at or below the unseen cutoff
//! map to `f64::INFINITY` so they are excluded downstream instead of being
//! fitted as a huge but finite range.

use crate::core::{
    DistanceEstimate, Observation, PATH_LOSS_EXPONENT, RSSI_REF_AT_1M_DBM, UNSEEN_CUTOFF_DBM,
};
use serde::{Deserialize, Serialize};

/// Distance model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathLossModel {
    /// Signal strength at 1 m (dBm)
    pub reference_strength_at_1m: f64,
    /// Path-loss exponent
    pub path_loss_exponent: f64,
    /// Readings at or below this are "not seen"
    pub unseen_cutoff_dbm: i32,
}

impl Default for PathLossModel {
    fn default() -> Self {
        Self {
            reference_strength_at_1m: RSSI_REF_AT_1M_DBM,
            path_loss_exponent: PATH_LOSS_EXPONENT,
            unseen_cutoff_dbm: UNSEEN_CUTOFF_DBM,
        }
    }
}

impl PathLossModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(reference_strength_at_1m: f64, path_loss_exponent: f64) -> Self {
        Self {
            reference_strength_at_1m,
            path_loss_exponent,
            ..Self::default()
        }
    }

    /// Range (m) for one reading. Never fails: returns a non-negative value
    /// or `f64::INFINITY` when the anchor is unseen or the arithmetic breaks down.
    pub fn estimate_distance(&self, signal_strength: i32) -> f64 {
        if signal_strength <= self.unseen_cutoff_dbm {
            return f64::INFINITY;
        }
        self.distance_for(signal_strength as f64)
    }

    /// Same model over a fractional reading, without the unseen cutoff
    pub fn distance_for(&self, signal_strength: f64) -> f64 {
        let exponent =
            (self.reference_strength_at_1m - signal_strength) / (10.0 * self.path_loss_exponent);
        let distance = 10f64.powf(exponent);
        if distance.is_finite() && distance >= 0.0 {
            distance
        } else {
            f64::INFINITY
        }
    }

    /// Inverse of `distance_for`: the reading this model predicts at `distance_m`
    pub fn expected_strength(&self, distance_m: f64) -> f64 {
        self.reference_strength_at_1m - 10.0 * self.path_loss_exponent * distance_m.log10()
    }

    /// Convert a batch of observations, keeping caller order
    pub fn estimate_all(&self, observations: &[Observation]) -> Vec<DistanceEstimate> {
        observations
            .iter()
            .map(|obs| DistanceEstimate {
                identifier: obs.identifier.clone(),
                distance_m: self.estimate_distance(obs.signal_strength),
            })
            .collect()
    }
}

/// Range with the default model parameters
pub fn estimate_distance(signal_strength: i32) -> f64 {
    PathLossModel::default().estimate_distance(signal_strength)
}
