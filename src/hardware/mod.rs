//! Radio scanner abstraction
//!
//! Platform scanners implement `SignalScanner`; the engine never knows how
//! readings were obtained.

pub mod scanner;
pub mod mock;

pub use scanner::{ScanError, ScanResult, SignalScanner};
pub use mock::MockScanner;
