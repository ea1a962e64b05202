//! Change classification against the tracking store.

use tracing::{debug, info};

use crate::error::TrackerError;
use crate::timestamp::Timestamp;
use crate::tracking::{TrackingState, TrackingStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    FirstSeen,
    Updated,
    Unchanged,
}

/// Sole writer of the tracking state.
#[derive(Debug)]
pub struct ChangeClassifier {
    store: TrackingStore,
}

impl ChangeClassifier {
    pub fn new(store: TrackingStore) -> Self {
        Self { store }
    }

    pub fn state(&self) -> &TrackingState {
        self.store.state()
    }

    pub fn into_store(self) -> TrackingStore {
        self.store
    }

    /// Classifies `repository` at `last_updated`. FIRST_SEEN and UPDATED are
    /// persisted before this returns; a stored value is only ever replaced by a
    /// strictly greater one.
    pub fn classify(
        &mut self,
        repository: &str,
        last_updated: &Timestamp,
    ) -> Result<Classification, TrackerError> {
        let classification = match self.store.get(repository) {
            None => Classification::FirstSeen,
            Some(stored) if stored < last_updated => Classification::Updated,
            Some(stored) => {
                debug!(
                    repository,
                    stored = %stored,
                    last_updated = %last_updated,
                    "Repository unchanged"
                );
                return Ok(Classification::Unchanged);
            }
        };

        self.store.record(repository, last_updated.clone())?;
        info!(
            repository,
            last_updated = %last_updated,
            ?classification,
            "Recorded repository change"
        );
        Ok(classification)
    }
}
