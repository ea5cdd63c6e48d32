//! Table-driven scanner for tests and demos

use crate::hardware::scanner::{ScanError, ScanResult, SignalScanner};
use std::collections::HashMap;

/// Scanner that replays a fixed set of readings
#[derive(Debug, Clone)]
pub struct MockScanner {
    readings: HashMap<String, i32>,
    connected: bool,
    /// Error returned by the next scan, then cleared
    pending_failure: Option<String>,
    scans: u32,
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScanner {
    pub fn new() -> Self {
        Self {
            readings: HashMap::new(),
            connected: true,
            pending_failure: None,
            scans: 0,
        }
    }

    pub fn with_reading(mut self, identifier: impl Into<String>, strength: i32) -> Self {
        self.readings.insert(identifier.into(), strength);
        self
    }

    pub fn set_reading(&mut self, identifier: impl Into<String>, strength: i32) {
        self.readings.insert(identifier.into(), strength);
    }

    /// Simulate the scan command disappearing
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    /// Make the next scan fail with `reason`
    pub fn fail_next_scan(&mut self, reason: impl Into<String>) {
        self.pending_failure = Some(reason.into());
    }

    pub fn scan_count(&self) -> u32 {
        self.scans
    }
}

impl SignalScanner for MockScanner {
    fn scan(&mut self, identifiers: &[String]) -> ScanResult<HashMap<String, i32>> {
        if !self.connected {
            return Err(ScanError::Unavailable("mock scanner disconnected".to_string()));
        }
        self.scans += 1;
        if let Some(reason) = self.pending_failure.take() {
            return Err(ScanError::Failed(reason));
        }
        Ok(identifiers
            .iter()
            .filter_map(|id| self.readings.get(id).map(|s| (id.clone(), *s)))
            .collect())
    }
}
