//! Anchor configuration file, `{"anchors": [{"identifier", "x", "y"}]}`

use crate::core::Anchor;
use crate::error::Result;
use crate::processing::parser::RequestParser;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct AnchorEntry<'a> {
    identifier: &'a str,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct AnchorFile<'a> {
    anchors: Vec<AnchorEntry<'a>>,
}

#[derive(Debug, Clone)]
pub struct AnchorStore {
    path: PathBuf,
}

impl AnchorStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` if nothing has been saved yet. The file goes through the same
    /// validation as a submitted configuration.
    pub fn load(&self) -> Result<Option<Vec<Anchor>>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value: Value = serde_json::from_str(&data)?;
        let anchors = RequestParser::strict().parse_anchor_config(&value)?;
        Ok(Some(anchors))
    }

    pub fn save(&self, anchors: &[Anchor]) -> Result<()> {
        let file = AnchorFile {
            anchors: anchors
                .iter()
                .map(|a| AnchorEntry {
                    identifier: &a.identifier,
                    x: a.position.x,
                    y: a.position.y,
                })
                .collect(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}
