//! JSON store for the visited-cell set: `[[row, col], ...]`

use crate::core::GridCell;
use crate::error::Result;
use log::warn;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored cells. A missing file is an empty set; so is an
    /// unreadable one, after a warning, so a damaged file never blocks startup.
    pub fn load(&self) -> Vec<GridCell> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Cannot read progress file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<GridCell>>(&data) {
            Ok(cells) => cells,
            Err(e) => {
                warn!(
                    "Ignoring malformed progress file {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Rewrite the whole set. Goes through a sibling temp file so a failed
    /// write leaves the previous contents intact.
    pub fn save(&self, cells: &[GridCell]) -> Result<()> {
        let json = serde_json::to_string(cells)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_round_trip_preserves_membership() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        let cells = vec![GridCell::new(0, 0), GridCell::new(-3, 4), GridCell::new(7, -1)];

        store.save(&cells).unwrap();
        let loaded: HashSet<GridCell> = store.load().into_iter().collect();
        let expected: HashSet<GridCell> = cells.into_iter().collect();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_file_format_is_list_of_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        store.save(&[GridCell::new(1, 2), GridCell::new(-1, 0)]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "[[1,2],[-1,0]]");
    }

    #[test]
    fn test_missing_or_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("absent.json"));
        assert!(store.load().is_empty());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(ProgressStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_reads_files_written_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "[[3, 5], [0, -2]]").unwrap();

        let cells = ProgressStore::new(&path).load();
        assert_eq!(cells, vec![GridCell::new(3, 5), GridCell::new(0, -2)]);
    }
}
