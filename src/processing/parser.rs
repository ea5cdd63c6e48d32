//! JSON request parsing and input validation.
//!
//! Everything the engine consumes from outside passes through here first, so
//! malformed input is rejected before any registry is touched. Two request
//! shapes are accepted for each operation:
//!
//! * anchors: `{"anchors": [{"identifier", "x", "y"}]}` or `{"routers": [{"ssid", "x", "y"}]}`
//! * estimate: `{"ground_truth": {"x", "y"}, "observations": [{"identifier", "signal_strength"}]}`
//!   or `{"x", "y", "rssi": {"<identifier>": <strength>}}`

use crate::api::types::EstimateRequest;
use crate::core::{Anchor, Observation, Point2};
use crate::error::InputError;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Parser for anchor configurations and estimation requests
#[derive(Debug, Clone)]
pub struct RequestParser {
    /// Treat a missing anchor coordinate as 0.0 instead of rejecting it
    default_missing_coordinates: bool,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            default_missing_coordinates: true,
        }
    }

    /// Require `x` and `y` on every anchor entry
    pub fn strict() -> Self {
        Self {
            default_missing_coordinates: false,
        }
    }

    /// Parse an anchor configuration document
    pub fn parse_anchor_config(&self, value: &Value) -> Result<Vec<Anchor>, InputError> {
        let root = as_object(value, "anchor configuration")?;
        let entries = root
            .get("anchors")
            .or_else(|| root.get("routers"))
            .ok_or_else(|| InputError::MissingField {
                field: "anchors".to_string(),
            })?;
        let entries = entries.as_array().ok_or_else(|| InputError::InvalidShape {
            details: "`anchors` must be a list".to_string(),
        })?;

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| self.parse_anchor_entry(i, entry))
            .collect()
    }

    fn parse_anchor_entry(&self, index: usize, entry: &Value) -> Result<Anchor, InputError> {
        let entry = as_object(entry, &format!("anchors[{}]", index))?;
        let identifier = match entry.get("identifier").or_else(|| entry.get("ssid")) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(InputError::MissingField {
                    field: format!("anchors[{}].identifier", index),
                })
            }
            Some(other) => {
                return Err(InputError::InvalidShape {
                    details: format!("anchors[{}].identifier must be a string, got {}", index, other),
                })
            }
        };

        let x = self.anchor_coordinate(entry, index, "x")?;
        let y = self.anchor_coordinate(entry, index, "y")?;
        Ok(Anchor::new(identifier, x, y))
    }

    fn anchor_coordinate(
        &self,
        entry: &Map<String, Value>,
        index: usize,
        key: &str,
    ) -> Result<f64, InputError> {
        let field = format!("anchors[{}].{}", index, key);
        match entry.get(key) {
            None | Some(Value::Null) if self.default_missing_coordinates => Ok(0.0),
            None | Some(Value::Null) => Err(InputError::MissingField { field }),
            Some(v) => coerce_f64(v, &field),
        }
    }

    /// Parse an estimation or save request
    pub fn parse_estimate_request(&self, value: &Value) -> Result<EstimateRequest, InputError> {
        let root = as_object(value, "request")?;

        let (ground_truth, observations) = if let Some(gt) = root.get("ground_truth") {
            let gt = as_object(gt, "ground_truth")?;
            let point = Point2::new(
                required_f64(gt, "x", "ground_truth.x")?,
                required_f64(gt, "y", "ground_truth.y")?,
            );
            let list = root.get("observations").ok_or_else(|| InputError::MissingField {
                field: "observations".to_string(),
            })?;
            (point, parse_observation_list(list)?)
        } else {
            let point = Point2::new(required_f64(root, "x", "x")?, required_f64(root, "y", "y")?);
            let observations = match root.get("rssi") {
                None | Some(Value::Null) => Vec::new(),
                Some(readings) => parse_observation_map(readings)?,
            };
            (point, observations)
        };

        Ok(EstimateRequest::new(ground_truth, observations))
    }
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, InputError> {
    value.as_object().ok_or_else(|| InputError::InvalidShape {
        details: format!("{} must be a JSON object", what),
    })
}

fn required_f64(obj: &Map<String, Value>, key: &str, field: &str) -> Result<f64, InputError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(InputError::MissingField {
            field: field.to_string(),
        }),
        Some(v) => coerce_f64(v, field),
    }
}

/// Number or numeric string, finite
fn coerce_f64(value: &Value, field: &str) -> Result<f64, InputError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let number = parsed.ok_or_else(|| InputError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    if !number.is_finite() {
        return Err(InputError::NonFinite {
            field: field.to_string(),
        });
    }
    Ok(number)
}

/// Integer, integral float, or integer string within `i32`
fn coerce_strength(value: &Value, field: &str) -> Result<i32, InputError> {
    let invalid = || InputError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    };
    let number = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i as f64,
            None => n.as_f64().ok_or_else(invalid)?,
        },
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    if number.fract() != 0.0 || number < i32::MIN as f64 || number > i32::MAX as f64 {
        return Err(invalid());
    }
    Ok(number as i32)
}

fn parse_observation_list(value: &Value) -> Result<Vec<Observation>, InputError> {
    let items = value.as_array().ok_or_else(|| InputError::InvalidShape {
        details: "`observations` must be a list".to_string(),
    })?;

    let mut seen = HashSet::new();
    let mut observations = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item = as_object(item, &format!("observations[{}]", i))?;
        let identifier = match item.get("identifier") {
            Some(Value::String(s)) => s.clone(),
            _ => {
                return Err(InputError::MissingField {
                    field: format!("observations[{}].identifier", i),
                })
            }
        };
        if !seen.insert(identifier.clone()) {
            return Err(InputError::InvalidShape {
                details: format!("duplicate observation for `{}`", identifier),
            });
        }
        let field = format!("observations[{}].signal_strength", i);
        let strength = match item.get("signal_strength") {
            None | Some(Value::Null) => return Err(InputError::MissingField { field }),
            Some(v) => coerce_strength(v, &field)?,
        };
        observations.push(Observation::new(identifier, strength));
    }
    Ok(observations)
}

/// `{"<identifier>": strength}`; object order is the caller order
fn parse_observation_map(value: &Value) -> Result<Vec<Observation>, InputError> {
    let readings = as_object(value, "rssi")?;
    readings
        .iter()
        .map(|(identifier, v)| {
            let strength = coerce_strength(v, &format!("rssi.{}", identifier))?;
            Ok(Observation::new(identifier.clone(), strength))
        })
        .collect()
}
