use crate::algorithms::{MultilaterationSolver, PathLossModel};
use crate::core::{DEFAULT_CELL_SIZE_M, MIN_ANCHORS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Engine configuration, loaded from JSON. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Signal-strength to distance model
    pub path_loss: PathLossModel,
    /// Multilateration parameters
    pub solver: MultilaterationSolver,
    /// Survey grid
    pub grid: GridConfig,
    /// File locations
    pub storage: StorageConfig,
}

/// Survey grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge length (meters)
    pub cell_size_m: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size_m: DEFAULT_CELL_SIZE_M,
        }
    }
}

/// Durable store locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Append-only fingerprint CSV
    pub fingerprints_path: PathBuf,
    /// Visited-cell set
    pub progress_path: PathBuf,
    /// Last submitted anchor configuration
    pub anchors_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            fingerprints_path: PathBuf::from("fingerprints.csv"),
            progress_path: PathBuf::from("progress.json"),
            anchors_path: PathBuf::from("anchors.json"),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let path_loss = &self.path_loss;
        if !path_loss.reference_strength_at_1m.is_finite() {
            return Err(invalid(
                "path_loss.reference_strength_at_1m",
                path_loss.reference_strength_at_1m,
                "must be finite",
            ));
        }
        if !(path_loss.path_loss_exponent.is_finite() && path_loss.path_loss_exponent > 0.0) {
            return Err(invalid(
                "path_loss.path_loss_exponent",
                path_loss.path_loss_exponent,
                "must be positive",
            ));
        }

        if self.solver.min_anchors < MIN_ANCHORS {
            return Err(invalid(
                "solver.min_anchors",
                self.solver.min_anchors,
                "a 2-D fix needs at least 3 anchors",
            ));
        }
        let tol = self.solver.singular_value_tolerance;
        if !(tol > 0.0 && tol < 1.0) {
            return Err(invalid(
                "solver.singular_value_tolerance",
                tol,
                "must be in (0, 1)",
            ));
        }

        let cell = self.grid.cell_size_m;
        if !(cell.is_finite() && cell > 0.0) {
            return Err(invalid("grid.cell_size_m", cell, "must be positive"));
        }

        Ok(())
    }
}

fn invalid(parameter: &str, value: impl std::fmt::Display, reason: &str) -> Error {
    Error::Config(format!("invalid {} = {}: {}", parameter, value, reason))
}
