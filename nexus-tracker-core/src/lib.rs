#![doc = "nexus-tracker-core: core logic library for nexus-tracker."]

//! This crate holds the discovery pipeline for artifacts hosted in a Nexus
//! repository manager: listing pagination, change detection against persisted
//! tracking state, and selection of the versions that need re-publishing.
//!
//! # Usage
//! Wire a [`contract::Transport`], a [`contract::Publisher`] and a
//! [`classify::ChangeClassifier`] together and hand them to [`discovery::run`].
//! The CLI crate does exactly this; tests use the generated mocks.

pub mod classify;
pub mod client;
pub mod config;
pub mod contract;
pub mod credentials;
pub mod discovery;
pub mod error;
pub mod metadata;
pub mod select;
pub mod timestamp;
pub mod tracking;

pub use error::TrackerError;
