#![allow(unused)]

//! # contract: seams between the discovery pipeline and its environment
//!
//! The pipeline talks to two collaborators, both defined here as traits:
//!
//! - [`Transport`]: authenticated GETs against the repository manager, either
//!   parsed JSON (listing endpoint) or raw bytes (XML documents).
//! - [`Publisher`]: the downstream sink receiving [`PublishRecord`]s.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`; with the `test-export-mocks`
//!   feature the generated `MockTransport` and `MockPublisher` are public so
//!   integration tests can script whole runs.
//!
//! ## Wire types
//! - [`ListingPage`] / [`ListingItem`] mirror the search endpoint's JSON.
//! - [`PublishRecord`] serializes with the field names downstream expects.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// One page of the repository manager's item listing. `items` is required;
/// a body without it is not a listing page.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    pub items: Vec<ListingItem>,
    #[serde(rename = "continuationToken", default)]
    pub continuation_token: Option<String>,
}

/// A listed component. Fields beyond these three are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingItem {
    pub repository: String,
    pub group: String,
    pub name: String,
}

/// The unit emitted downstream, one per selected artifact version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub timestamp: String,
    pub version: String,
    #[serde(rename = "currentID")]
    pub current_id: String,
    #[serde(rename = "resourceKey")]
    pub resource_key: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Author")]
    pub author: String,
}

/// Authenticated access to the repository manager.
///
/// Implementors attach credentials themselves; callers only hand over URLs.
/// Non-success HTTP statuses must surface as [`TrackerError::Transport`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and decode the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, TrackerError>;

    /// GET `url` and return the raw body, for XML-bearing endpoints.
    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>, TrackerError>;
}

/// Downstream sink for discovered versions. Delivery guarantees are the
/// implementor's concern.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, records: Vec<PublishRecord>) -> Result<(), TrackerError>;
}
