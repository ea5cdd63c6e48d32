//! Survey collection session: estimation plus the durable side effects of a save.

use crate::api::engine::PositioningEngine;
use crate::api::types::{EstimateRequest, SaveOutcome};
use crate::core::Anchor;
use crate::error::Result;
use crate::storage::{AnchorStore, FingerprintLog, FingerprintRecord, ProgressStore};
use crate::utils::config::EngineConfig;
use log::{info, warn};
use parking_lot::Mutex;

pub struct CollectionSession {
    engine: PositioningEngine,
    fingerprints: FingerprintLog,
    progress_store: ProgressStore,
    anchor_store: AnchorStore,
    /// Set while the progress file lags the in-memory set. Held across
    /// rewrites so an older snapshot never lands last.
    progress_dirty: Mutex<bool>,
}

impl CollectionSession {
    /// Build the engine from `config` and reload anchors and progress from disk.
    /// An unreadable anchor file starts the session with no anchors so that
    /// `set_anchors` can replace it.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let session = Self {
            engine: PositioningEngine::new(config),
            fingerprints: FingerprintLog::new(&config.storage.fingerprints_path),
            progress_store: ProgressStore::new(&config.storage.progress_path),
            anchor_store: AnchorStore::new(&config.storage.anchors_path),
            progress_dirty: Mutex::new(false),
        };

        session.engine.progress().load(session.progress_store.load());
        match session.anchor_store.load() {
            Ok(Some(anchors)) => session.engine.set_anchors(anchors),
            Ok(None) => {}
            Err(e) => warn!(
                "Ignoring unreadable anchor file {}: {}",
                session.anchor_store.path().display(),
                e
            ),
        }

        info!(
            "Session opened: {} anchors, {} cells visited",
            session.engine.anchors().len(),
            session.engine.progress().len()
        );
        Ok(session)
    }

    pub fn engine(&self) -> &PositioningEngine {
        &self.engine
    }

    /// Replace the anchor set and persist it for the next session
    pub fn set_anchors(&self, anchors: Vec<Anchor>) -> Result<()> {
        self.anchor_store.save(&anchors)?;
        self.engine.set_anchors(anchors);
        Ok(())
    }

    /// Estimate, append the fingerprint, and mark the ground-truth cell.
    ///
    /// A failed append returns the error with nothing marked. A failed
    /// progress rewrite keeps the in-memory mark and reports
    /// `progress_persisted = false`; the next save rewrites the file even if
    /// its cell was already visited.
    pub fn save(&self, request: &EstimateRequest) -> Result<SaveOutcome> {
        let result = self.engine.estimate(request);

        let record = FingerprintRecord {
            ground_truth: request.ground_truth,
            observations: request.observations.clone(),
            estimate: result.position,
        };
        self.fingerprints.append(&record)?;

        let cell = self
            .engine
            .cell_of(request.ground_truth.x, request.ground_truth.y);
        let newly_visited = self.engine.progress().mark_visited(cell);

        let progress_persisted = self.persist_progress(newly_visited);

        Ok(SaveOutcome {
            result,
            cell,
            newly_visited,
            progress_persisted,
        })
    }

    fn persist_progress(&self, newly_visited: bool) -> bool {
        let mut dirty = self.progress_dirty.lock();
        if !newly_visited && !*dirty {
            return true;
        }

        let cells = self.engine.progress().snapshot();
        match self.progress_store.save(&cells) {
            Ok(()) => {
                *dirty = false;
                true
            }
            Err(e) => {
                warn!(
                    "Could not write progress to {}: {}",
                    self.progress_store.path().display(),
                    e
                );
                *dirty = true;
                false
            }
        }
    }
}
