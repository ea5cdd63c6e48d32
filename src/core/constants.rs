//! Radio model defaults and engine parameters

/// Received signal strength expected at 1 m from an anchor (dBm)
pub const RSSI_REF_AT_1M_DBM: f64 = -40.0;

/// Log-distance path-loss exponent (2.0 = free space)
pub const PATH_LOSS_EXPONENT: f64 = 2.0;

/// Readings at or below this value are treated as "effectively unseen" by the distance model
pub const UNSEEN_CUTOFF_DBM: i32 = -99;

/// Value a scanner reports for a requested identifier it did not detect.
/// Distinct from `UNSEEN_CUTOFF_DBM`: one is a scanner default, the other a model cutoff.
pub const SCANNER_NOT_FOUND_DBM: i32 = -100;

/// Range constraints needed for a 2-D fix
pub const MIN_ANCHORS: usize = 3;

/// Default grid cell edge length (m)
pub const DEFAULT_CELL_SIZE_M: f64 = 1.0;
