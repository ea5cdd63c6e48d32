//! Error types for the positioning engine
//!
//! Numeric degeneracy (unseen anchors, too few anchors, collinear geometry)
//! is never an error here. Those outcomes travel in return values as
//! `f64::INFINITY` and `PositionEstimate::Undetermined`.

use thiserror::Error;

/// Malformed caller input, rejected before any state is touched
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` is not a number: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("field `{field}` must be finite")]
    NonFinite { field: String },

    #[error("invalid request shape: {details}")]
    InvalidShape { details: String },
}

/// Crate error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
