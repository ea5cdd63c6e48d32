//! Append-only CSV log of fingerprint records.
//!
//! Row layout: `x_meter,y_meter,<strength per identifier>,est_x_m,est_y_m`.
//! The header is written once, with the first record, and follows that
//! record's identifier order. Later records are not checked against it.

use crate::core::{Observation, Point2, PositionEstimate};
use crate::error::Result;
use log::debug;
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One saved survey sample
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintRecord {
    pub ground_truth: Point2,
    /// Caller-supplied order
    pub observations: Vec<Observation>,
    pub estimate: PositionEstimate,
}

impl FingerprintRecord {
    pub fn header(&self) -> Vec<String> {
        let mut fields = vec!["x_meter".to_string(), "y_meter".to_string()];
        fields.extend(self.observations.iter().map(|o| o.identifier.clone()));
        fields.push("est_x_m".to_string());
        fields.push("est_y_m".to_string());
        fields
    }

    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            format!("{:.2}", self.ground_truth.x),
            format!("{:.2}", self.ground_truth.y),
        ];
        fields.extend(self.observations.iter().map(|o| o.signal_strength.to_string()));
        match self.estimate {
            PositionEstimate::Determined(p) => {
                fields.push(format!("{:.2}", p.x));
                fields.push(format!("{:.2}", p.y));
            }
            PositionEstimate::Undetermined => {
                fields.push(String::new());
                fields.push(String::new());
            }
        }
        fields
    }
}

/// Quote a field if it holds a delimiter, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn format_row(fields: &[String]) -> String {
    let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    format!("{}\r\n", escaped.join(","))
}

/// CSV file that only ever grows
#[derive(Debug)]
pub struct FingerprintLog {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl FingerprintLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            append_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new or empty
    pub fn append(&self, record: &FingerprintRecord) -> Result<()> {
        let _guard = self.append_lock.lock();

        let write_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let mut text = String::new();
        if write_header {
            text.push_str(&format_row(&record.header()));
        }
        text.push_str(&format_row(&record.fields()));

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        debug!("Appended fingerprint to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: f64, y: f64, estimate: PositionEstimate) -> FingerprintRecord {
        FingerprintRecord {
            ground_truth: Point2::new(x, y),
            observations: vec![Observation::new("lab-ap", -52), Observation::new("hall", -100)],
            estimate,
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = FingerprintLog::new(dir.path().join("fingerprints.csv"));

        log.append(&record(1.0, 2.0, PositionEstimate::Determined(Point2::new(1.234, 2.346))))
            .unwrap();
        log.append(&record(3.456, 4.0, PositionEstimate::Undetermined)).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "x_meter,y_meter,lab-ap,hall,est_x_m,est_y_m",
                "1.00,2.00,-52,-100,1.23,2.35",
                "3.46,4.00,-52,-100,,",
            ]
        );
    }

    #[test]
    fn test_existing_file_gets_no_second_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fingerprints.csv");
        fs::write(&path, "x_meter,y_meter,lab-ap,hall,est_x_m,est_y_m\r\n").unwrap();

        FingerprintLog::new(&path)
            .append(&record(0.0, 0.0, PositionEstimate::Undetermined))
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("x_meter").count(), 1);
    }

    #[test]
    fn test_identifiers_with_delimiters_are_quoted() {
        let fields = vec!["Cafe, 2nd floor".to_string(), "say \"hi\"".to_string(), "-60".to_string()];
        assert_eq!(format_row(&fields), "\"Cafe, 2nd floor\",\"say \"\"hi\"\"\",-60\r\n");
    }
}
