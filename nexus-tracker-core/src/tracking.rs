//! Tracking store: repository id → last seen `lastUpdated`, persisted as a flat
//! JSON object.
//!
//! The file is rewritten in full on every mutation (temp file in the same
//! directory, then rename), so a crash leaves either the previous document or
//! the new one on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::TrackerError;
use crate::timestamp::Timestamp;

pub type TrackingState = BTreeMap<String, Timestamp>;

#[derive(Debug)]
pub struct TrackingStore {
    path: PathBuf,
    state: TrackingState,
}

impl TrackingStore {
    /// Loads the store from `path`. A missing file yields an empty state.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TrackerError> {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => TrackingState::new(),
            Ok(content) => serde_json::from_str::<TrackingState>(&content).map_err(|e| {
                error!(error = ?e, path = %path.display(), "Tracking file is not valid JSON");
                TrackerError::parse(format!("tracking file {}", path.display()), e)
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No tracking file yet, starting empty");
                TrackingState::new()
            }
            Err(e) => {
                error!(error = ?e, path = %path.display(), "Failed to read tracking file");
                return Err(TrackerError::Persistence { path, source: e });
            }
        };
        info!(path = %path.display(), entries = state.len(), "Tracking store loaded");
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn get(&self, repository: &str) -> Option<&Timestamp> {
        self.state.get(repository)
    }

    /// Stores `timestamp` for `repository` and flushes before returning. On a
    /// failed flush the previous value is restored so memory matches disk.
    pub(crate) fn record(
        &mut self,
        repository: &str,
        timestamp: Timestamp,
    ) -> Result<(), TrackerError> {
        let previous = self.state.insert(repository.to_string(), timestamp);
        if let Err(e) = self.flush() {
            match previous {
                Some(old) => self.state.insert(repository.to_string(), old),
                None => self.state.remove(repository),
            };
            return Err(e);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), TrackerError> {
        let persistence = |source: std::io::Error| TrackerError::Persistence {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(persistence)?;

        let json = serde_json::to_vec_pretty(&self.state)
            .map_err(|e| persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(persistence)?;
        tmp.write_all(&json).map_err(persistence)?;
        tmp.as_file().sync_all().map_err(persistence)?;
        tmp.persist(&self.path).map_err(|e| {
            error!(error = ?e.error, path = %self.path.display(), "Failed to replace tracking file");
            persistence(e.error)
        })?;

        debug!(path = %self.path.display(), entries = self.state.len(), "Tracking store flushed");
        Ok(())
    }
}
