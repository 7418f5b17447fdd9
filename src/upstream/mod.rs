//! Upstream — HTTP client for the remote image/video generation API.
//!
//! DESIGN
//! ======
//! Routes depend on the `GenerationApi` trait rather than the concrete
//! `reqwest` client so handlers and the polling loop can be exercised
//! against an in-process mock. The client never interprets payloads: it
//! attaches the bearer credential, sends JSON, and hands back the status
//! code and decoded body.

pub mod types;

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use types::{UpstreamError, UpstreamResponse, decode_body};

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait GenerationApi: Send + Sync {
    /// `POST {base}{path}` with a JSON body.
    async fn post_json(&self, path: &str, body: &Value) -> Result<UpstreamResponse, UpstreamError>;

    /// `GET {base}{path}`.
    async fn get_json(&self, path: &str) -> Result<UpstreamResponse, UpstreamError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GenerationClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GenerationClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            config.api_key.clone(),
            &config.api_base_url,
            Duration::from_secs(config.timeouts.request_secs),
            Duration::from_secs(config.timeouts.connect_secs),
        )
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        api_key: String,
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| UpstreamError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url: base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<UpstreamResponse, UpstreamError> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;
        Ok(UpstreamResponse::new(status, decode_body(&text)))
    }
}

#[async_trait::async_trait]
impl GenerationApi for GenerationClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "upstream: POST");
        self.send(self.http.post(url).json(body)).await
    }

    async fn get_json(&self, path: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "upstream: GET");
        self.send(self.http.get(url)).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
