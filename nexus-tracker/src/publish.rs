//! JSON-lines [`Publisher`] sinks for the CLI: one serialized record per line,
//! to stdout or appended to a file.

use async_trait::async_trait;
use nexus_tracker_core::contract::{PublishRecord, Publisher};
use nexus_tracker_core::TrackerError;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::load_config::PublishSection;

pub struct JsonLinesPublisher {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesPublisher {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn append_to<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::info!(path = %path.display(), "Publishing records to file");
        Ok(Self::new(Box::new(file)))
    }

    pub fn from_section(section: &PublishSection) -> io::Result<Self> {
        match section {
            PublishSection::Stdout => Ok(Self::stdout()),
            PublishSection::File { path } => Self::append_to(path),
        }
    }
}

#[async_trait]
impl Publisher for JsonLinesPublisher {
    async fn publish(&self, records: Vec<PublishRecord>) -> Result<(), TrackerError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| TrackerError::Publish("output sink poisoned".into()))?;
        for record in &records {
            let line =
                serde_json::to_string(record).map_err(|e| TrackerError::Publish(e.to_string()))?;
            writeln!(out, "{line}").map_err(|e| TrackerError::Publish(e.to_string()))?;
        }
        out.flush()
            .map_err(|e| TrackerError::Publish(e.to_string()))?;
        tracing::debug!(count = records.len(), "Wrote records to sink");
        Ok(())
    }
}
