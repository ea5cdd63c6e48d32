//! Request and response types for the estimation API

use crate::core::{Anchor, DistanceEstimate, GridCell, Observation, Point2, PositionEstimate};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Survey sample submitted by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRequest {
    /// Where the surveyor says they are standing
    pub ground_truth: Point2,
    /// Readings in caller order; identifiers are unique
    pub observations: Vec<Observation>,
}

impl EstimateRequest {
    /// `observations` must not repeat an identifier; results and the
    /// serialized distance map are keyed by it. Checked in debug builds.
    pub fn new(ground_truth: Point2, observations: Vec<Observation>) -> Self {
        debug_assert!(
            observations
                .iter()
                .enumerate()
                .all(|(i, o)| observations[..i].iter().all(|p| p.identifier != o.identifier)),
            "duplicate observation identifier"
        );
        Self {
            ground_truth,
            observations,
        }
    }
}

/// Ranges and position derived from one request
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateResult {
    /// One entry per observation, in request order
    pub distances: Vec<DistanceEstimate>,
    pub position: PositionEstimate,
    /// Anchors that entered the solve
    pub anchors_used: usize,
    /// RMS range residual of the fit (m), when determined
    pub rms_residual_m: Option<f64>,
}

impl EstimateResult {
    pub fn distance_of(&self, identifier: &str) -> Option<f64> {
        self.distances
            .iter()
            .find(|d| d.identifier == identifier)
            .map(|d| d.distance_m)
    }
}

/// `identifier -> meters`, with unusable ranges written as `"∞"`
struct DistanceMap<'a>(&'a [DistanceEstimate]);

impl Serialize for DistanceMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for estimate in self.0 {
            if estimate.distance_m.is_finite() {
                map.serialize_entry(&estimate.identifier, &estimate.distance_m)?;
            } else {
                map.serialize_entry(&estimate.identifier, "∞")?;
            }
        }
        map.end()
    }
}

impl Serialize for EstimateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EstimateResult", 4)?;
        state.serialize_field("per_anchor_distance_m", &DistanceMap(&self.distances))?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("anchors_used", &self.anchors_used)?;
        state.serialize_field("rms_residual_m", &self.rms_residual_m)?;
        state.end()
    }
}

/// What a save did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub result: EstimateResult,
    /// Cell containing the ground-truth coordinate
    pub cell: GridCell,
    /// `false` if the cell had already been sampled
    pub newly_visited: bool,
    /// `false` if the progress file could not be rewritten
    pub progress_persisted: bool,
}

/// Current anchors and survey coverage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub anchors: Vec<Anchor>,
    pub completed: Vec<GridCell>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_serialization() {
        let result = EstimateResult {
            distances: vec![
                DistanceEstimate { identifier: "B".to_string(), distance_m: 2.5 },
                DistanceEstimate { identifier: "A".to_string(), distance_m: f64::INFINITY },
            ],
            position: PositionEstimate::Undetermined,
            anchors_used: 1,
            rms_residual_m: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "per_anchor_distance_m": { "B": 2.5, "A": "∞" },
                "position": "undetermined",
                "anchors_used": 1,
                "rms_residual_m": null
            })
        );

        let text = serde_json::to_string(&result).unwrap();
        assert!(text.find("\"B\"").unwrap() < text.find("\"A\"").unwrap());
    }

    #[test]
    fn test_distance_lookup() {
        let result = EstimateResult {
            distances: vec![DistanceEstimate { identifier: "x".to_string(), distance_m: 1.0 }],
            position: PositionEstimate::Determined(Point2::new(0.0, 0.0)),
            anchors_used: 3,
            rms_residual_m: Some(0.0),
        };
        assert_eq!(result.distance_of("x"), Some(1.0));
        assert_eq!(result.distance_of("y"), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate observation identifier")]
    fn test_request_rejects_repeated_identifier() {
        EstimateRequest::new(
            Point2::new(0.0, 0.0),
            vec![Observation::new("A", -50), Observation::new("A", -55)],
        );
    }
}
