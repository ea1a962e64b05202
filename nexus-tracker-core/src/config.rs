use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_GROUP_PATH_DEPTH: usize = 3;

fn default_group_path_depth() -> usize {
    DEFAULT_GROUP_PATH_DEPTH
}

/// Where the repository manager lives and how to page through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NexusConfig {
    /// Repository manager root, e.g. `http://nexus.local:8081/`.
    pub base_url: String,
    /// First listing query including page size and filters. Relative values
    /// are resolved against `base_url`.
    pub first_end_point: String,
    /// How many group separators become path separators in URLs.
    #[serde(default = "default_group_path_depth")]
    pub group_path_depth: usize,
}

impl NexusConfig {
    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.base_url,
            first_end_point = %self.first_end_point,
            group_path_depth = self.group_path_depth,
            "Loaded Nexus config"
        );
        debug!(?self, "Nexus config loaded (full debug)");
    }
}
