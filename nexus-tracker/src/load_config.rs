//! `load_config` module: Loads a static YAML config into the CLI's typed config.
//!
//! Secrets never live in the YAML file. The principal and password are looked
//! up from the environment at run time through
//! [`nexus_tracker_core::credentials::EnvCredentials`], using the prefix
//! configured under `credentials.env_prefix`.
//!
//! # Errors
//! All errors in this module use `anyhow::Error` and are surfaced at the CLI
//! boundary.

use anyhow::Result;
use nexus_tracker_core::config::NexusConfig;
use nexus_tracker_core::credentials::DEFAULT_ENV_PREFIX;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub nexus: NexusConfig,
    pub tracking: TrackingSection,
    #[serde(default)]
    pub publish: PublishSection,
    #[serde(default)]
    pub credentials: CredentialsSection,
}

#[derive(Debug, Deserialize)]
pub struct TrackingSection {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PublishSection {
    #[default]
    Stdout,
    File {
        path: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
pub struct CredentialsSection {
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,
}

impl Default for CredentialsSection {
    fn default() -> Self {
        Self {
            env_prefix: default_env_prefix(),
        }
    }
}

fn default_env_prefix() -> String {
    DEFAULT_ENV_PREFIX.to_string()
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if config.nexus.base_url.trim().is_empty() {
        error!(config_path = ?path_ref, "nexus.base_url is empty");
        anyhow::bail!("nexus.base_url must not be empty");
    }
    if config.nexus.first_end_point.trim().is_empty() {
        error!(config_path = ?path_ref, "nexus.first_end_point is empty");
        anyhow::bail!("nexus.first_end_point must not be empty");
    }

    config.nexus.trace_loaded();
    info!(
        tracking_path = %config.tracking.path.display(),
        publish = ?config.publish,
        "Config loaded successfully"
    );
    Ok(config)
}
