//! # nexus-tracker CLI Interface (Module)
//!
//! Command parsing and wiring of the concrete collaborators (HTTP client,
//! env credentials, JSON-lines sink, tracking file) into the core discovery
//! pipeline from [`nexus-tracker-core`].
//!
//! - `track`: one discovery pass; new versions go to the configured sink.
//! - `tracking`: prints the persisted tracking state as JSON.
//!
//! For programmatic/integration use: call [`run`] with a constructed [`Cli`].
//!
//! [`nexus-tracker-core`]: ../../nexus-tracker-core/

use crate::load_config::load_config;
use crate::publish::JsonLinesPublisher;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nexus_tracker_core::classify::ChangeClassifier;
use nexus_tracker_core::client::NexusClient;
use nexus_tracker_core::credentials::{Credentials, EnvCredentials};
use nexus_tracker_core::discovery;
use nexus_tracker_core::tracking::TrackingStore;
use std::path::PathBuf;

/// CLI for nexus-tracker: report newly published artifact versions.
#[derive(Parser)]
#[clap(
    name = "nexus-tracker",
    version,
    about = "Discover newly published Maven artifact versions in a Nexus repository manager"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one discovery pass and publish new versions
    Track {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Print the persisted tracking state
    Tracking {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Track { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "track", "Starting discovery run");

            let credentials =
                Credentials::from_source(&EnvCredentials::new(&config.credentials.env_prefix))
                    .context("Failed to load repository credentials from env")?;
            let author = credentials.principal.clone();
            let client = NexusClient::new(credentials);

            let publisher = JsonLinesPublisher::from_section(&config.publish)
                .context("Failed to open publish sink")?;
            let store = TrackingStore::open(&config.tracking.path)
                .context("Failed to open tracking store")?;
            let mut classifier = ChangeClassifier::new(store);

            match discovery::run(&config.nexus, &author, &client, &publisher, &mut classifier)
                .await
            {
                Ok(report) => {
                    tracing::info!(command = "track", ?report, "Discovery run complete");
                    eprintln!(
                        "Discovery complete: {} page(s), {} artifact(s), {} record(s) published, {} version(s) skipped",
                        report.pages,
                        report.artifacts_processed,
                        report.records_published,
                        report.versions_skipped
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "track", error = %e, "Discovery run failed");
                    Err(anyhow::Error::new(e).context("Discovery run failed"))
                }
            }
        }
        Commands::Tracking { config } => {
            let config = load_config(config)?;
            let store = TrackingStore::open(&config.tracking.path)
                .context("Failed to open tracking store")?;
            let json = serde_json::to_string_pretty(store.state())
                .context("Failed to serialize tracking state")?;
            println!("{json}");
            Ok(())
        }
    }
}
