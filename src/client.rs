//! Native HTTP transport
//!
//! [`PredictionTransport`] over `reqwest`, used by the CLI and the
//! integration tests.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::BackendConfig;
use crate::dispatch::{PredictionTransport, TransportResponse};
use crate::error::{DispatchError, DispatchResult};

/// Talks to a prediction API at `base_url`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DispatchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> DispatchResult<Self> {
        Self::new(&config.url, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn finish(response: reqwest::Response) -> DispatchResult<TransportResponse> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait(?Send)]
impl PredictionTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> DispatchResult<TransportResponse> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Self::finish(response).await
    }

    async fn get_json(&self, path: &str) -> DispatchResult<TransportResponse> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Self::finish(response).await
    }
}
