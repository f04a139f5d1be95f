//! HTTP client for the remote speller service

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::config::SpellerConfig;
use crate::error::SpellError;
use crate::extractor::Format;

/// Source of raw speller responses.
///
/// Implementors make a single attempt; retrying is never their job.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Response format this source produces
    fn format(&self) -> Format;

    /// Submit `text` and return the raw response body
    async fn fetch(&self, text: &str) -> Result<String, SpellError>;
}

/// Posts text as form data to a speller endpoint
pub struct SpellerClient {
    client: Client,
    endpoint: String,
    form_field: String,
    format: Format,
}

impl SpellerClient {
    /// Create a client from configuration
    pub fn from_config(config: &SpellerConfig) -> Result<Self> {
        let endpoint = config.get_endpoint().ok_or_else(|| {
            anyhow!(
                "No endpoint configured for the {} format (set speller.endpoint)",
                config.format
            )
        })?;

        Self::new(config, endpoint)
    }

    /// Create a client posting to an already resolved endpoint
    pub fn new(config: &SpellerConfig, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            form_field: config.form_field.clone(),
            format: config.format,
        })
    }

    /// Replace the endpoint resolved from configuration
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Fetch for SpellerClient {
    fn format(&self) -> Format {
        self.format
    }

    async fn fetch(&self, text: &str) -> Result<String, SpellError> {
        tracing::debug!("POST {} ({} chars)", self.endpoint, text.chars().count());

        let form = [(self.form_field.as_str(), text)];
        let response = self.client.post(&self.endpoint).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(SpellError::Transport(format!("speller returned HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| SpellError::Unknown(format!("could not read response body: {}", e)))
    }
}
