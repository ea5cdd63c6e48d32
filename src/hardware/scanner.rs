//! Radio scanner seam.
//!
//! How readings are acquired is platform specific and lives outside this
//! crate; the engine only consumes the identifier-to-strength map.

use crate::core::SCANNER_NOT_FOUND_DBM;
use std::collections::HashMap;
use thiserror::Error;

/// Scanner failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("scan command unavailable: {0}")]
    Unavailable(String),

    #[error("scan failed: {0}")]
    Failed(String),
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Source of signal-strength readings
pub trait SignalScanner {
    /// Readings for the requested identifiers. Identifiers that were not
    /// detected may be omitted or reported as `SCANNER_NOT_FOUND_DBM`.
    fn scan(&mut self, identifiers: &[String]) -> ScanResult<HashMap<String, i32>>;
}

/// Every requested identifier mapped to its reading, or to the not-found
/// sentinel if the scanner did not report it
pub fn complete_readings(
    identifiers: &[String],
    readings: HashMap<String, i32>,
) -> Vec<(String, i32)> {
    identifiers
        .iter()
        .map(|id| {
            let strength = readings.get(id).copied().unwrap_or(SCANNER_NOT_FOUND_DBM);
            (id.clone(), strength)
        })
        .collect()
}
