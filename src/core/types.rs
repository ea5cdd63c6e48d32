//! Core data types for the positioning engine

use serde::{Deserialize, Serialize, Serializer};

/// 2-D position on the floor plan, in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Wireless anchor (access point) at a surveyed position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Network identifier, case-sensitive
    pub identifier: String,
    pub position: Point2,
}

impl Anchor {
    pub fn new(identifier: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            identifier: identifier.into(),
            position: Point2::new(x, y),
        }
    }
}

/// One signal-strength reading for one anchor, in the scanner's native units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub identifier: String,
    pub signal_strength: i32,
}

impl Observation {
    pub fn new(identifier: impl Into<String>, signal_strength: i32) -> Self {
        Self {
            identifier: identifier.into(),
            signal_strength,
        }
    }
}

/// Range derived from an observation. `f64::INFINITY` marks an anchor that
/// was not usefully observed and must be left out of the solve.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceEstimate {
    pub identifier: String,
    pub distance_m: f64,
}

impl DistanceEstimate {
    pub fn is_usable(&self) -> bool {
        self.distance_m.is_finite()
    }
}

/// A known anchor position paired with the range measured to it
#[derive(Debug, Clone, PartialEq)]
pub struct RangeConstraint {
    pub identifier: String,
    pub position: Point2,
    pub distance_m: f64,
}

/// Outcome of a position solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionEstimate {
    Determined(Point2),
    /// Too few usable anchors or singular geometry
    Undetermined,
}

impl PositionEstimate {
    pub fn point(&self) -> Option<Point2> {
        match self {
            PositionEstimate::Determined(p) => Some(*p),
            PositionEstimate::Undetermined => None,
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, PositionEstimate::Determined(_))
    }
}

impl Serialize for PositionEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PositionEstimate::Determined(p) => p.serialize(serializer),
            PositionEstimate::Undetermined => serializer.serialize_str("undetermined"),
        }
    }
}

/// Cell of the unbounded survey lattice. Serialized as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct GridCell {
    pub row: i64,
    pub col: i64,
}

impl GridCell {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Cell containing `(x, y)`. Floors each axis, so `x = -0.5` with a
    /// 1 m cell lands in column -1.
    pub fn containing(x: f64, y: f64, cell_size_m: f64) -> Self {
        Self {
            row: (y / cell_size_m).floor() as i64,
            col: (x / cell_size_m).floor() as i64,
        }
    }
}

impl From<[i64; 2]> for GridCell {
    fn from(pair: [i64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<GridCell> for [i64; 2] {
    fn from(cell: GridCell) -> Self {
        [cell.row, cell.col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_cell_floor_semantics() {
        assert_eq!(GridCell::containing(-0.5, 0.5, 1.0), GridCell::new(0, -1));
        assert_eq!(GridCell::containing(2.99, -3.01, 1.0), GridCell::new(-4, 2));
        assert_eq!(GridCell::containing(5.0, 5.0, 2.5), GridCell::new(2, 2));
    }

    #[test]
    fn test_grid_cell_serializes_as_pair() {
        let json = serde_json::to_string(&GridCell::new(3, -2)).unwrap();
        assert_eq!(json, "[3,-2]");

        let cell: GridCell = serde_json::from_str("[-1,7]").unwrap();
        assert_eq!(cell, GridCell::new(-1, 7));
    }

    #[test]
    fn test_position_estimate_serialization() {
        let determined = PositionEstimate::Determined(Point2::new(1.5, -2.0));
        assert_eq!(serde_json::to_string(&determined).unwrap(), r#"{"x":1.5,"y":-2.0}"#);
        assert_eq!(
            serde_json::to_string(&PositionEstimate::Undetermined).unwrap(),
            r#""undetermined""#
        );
    }

    #[test]
    fn test_distance_estimate_usability() {
        let seen = DistanceEstimate { identifier: "A".to_string(), distance_m: 4.2 };
        let unseen = DistanceEstimate { identifier: "B".to_string(), distance_m: f64::INFINITY };
        assert!(seen.is_usable());
        assert!(!unseen.is_usable());
    }
}
