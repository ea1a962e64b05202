//! reqwest-backed [`Transport`] for a Nexus repository manager.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::contract::Transport;
use crate::credentials::Credentials;
use crate::error::TrackerError;

pub struct NexusClient {
    http: Client,
    credentials: Credentials,
}

impl NexusClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(Client::new(), credentials)
    }

    pub fn with_client(http: Client, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    pub fn principal(&self) -> &str {
        &self.credentials.principal
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, TrackerError> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url)
            .basic_auth(
                &self.credentials.principal,
                Some(&self.credentials.secret),
            )
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "Request to repository manager failed");
                TrackerError::transport(url, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(
                status = %status,
                url = %url,
                user = %self.credentials.principal,
                "Repository manager returned error. Response body: {body}"
            );
            return Err(TrackerError::transport(url, format!("HTTP {status}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for NexusClient {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, TrackerError> {
        self.get(url)
            .await?
            .json::<serde_json::Value>()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "Response body is not JSON");
                TrackerError::parse(format!("JSON response from {url}"), e)
            })
    }

    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>, TrackerError> {
        let bytes = self.get(url).await?.bytes().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to read response body");
            TrackerError::transport(url, e)
        })?;
        Ok(bytes.to_vec())
    }
}
