//! HTTP API Client
//!
//! `fetch`-backed transport for the prediction API.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde_json::Value;

use ecoinsight::dispatch::{PredictionTransport, TransportResponse};
use ecoinsight::{DispatchError, DispatchResult};

/// Local storage key holding an alternative API base URL
pub const API_URL_KEY: &str = "ecoinsight_api_url";

/// Same origin as the page
pub const DEFAULT_API_BASE: &str = "";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Sends prediction requests with the browser's `fetch`
#[derive(Debug, Clone)]
pub struct BrowserTransport {
    base_url: String,
}

impl BrowserTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Transport for the base URL configured in local storage
    pub fn from_storage() -> Self {
        Self::new(get_api_base())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network_error(err: gloo_net::Error) -> DispatchError {
    DispatchError::Transport(err.to_string())
}

/// Read the body whatever the status; the dispatcher decides what it means
async fn finish(response: Response) -> DispatchResult<TransportResponse> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;
    Ok(TransportResponse::new(status, body))
}

#[async_trait(?Send)]
impl PredictionTransport for BrowserTransport {
    async fn post_json(&self, path: &str, body: &Value) -> DispatchResult<TransportResponse> {
        let response = Request::post(&self.url(path))
            .json(body)
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)?;

        finish(response).await
    }

    async fn get_json(&self, path: &str) -> DispatchResult<TransportResponse> {
        let response = Request::get(&self.url(path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(network_error)?;

        finish(response).await
    }
}
