use std::path::PathBuf;

use thiserror::Error;

/// Every failure the discovery pipeline can surface.
///
/// `Transport` and `Parse` on a listing page abort a run. `Resolution` wraps
/// either of them when a manifest or package descriptor could not be obtained;
/// for descriptors the driver recovers by skipping that one version.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("transport error fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("failed to parse {context}: {message}")]
    Parse { context: String, message: String },

    #[error("could not resolve {what}: {source}")]
    Resolution {
        what: String,
        #[source]
        source: Box<TrackerError>,
    },

    #[error("tracking store at {path:?} could not be persisted: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential '{name}' unavailable: {message}")]
    Credential { name: String, message: String },

    #[error("publish failed: {0}")]
    Publish(String),
}

impl TrackerError {
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        TrackerError::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        TrackerError::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn resolution(what: impl Into<String>, source: TrackerError) -> Self {
        TrackerError::Resolution {
            what: what.into(),
            source: Box::new(source),
        }
    }
}
