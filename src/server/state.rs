//! Application State
//!
//! Shared state accessible by all host handlers.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{BackendConfig, ServerConfig};
use crate::server::error::{ServerError, ServerResult};

/// Shared state for all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Client used to forward `/api/*` to the prediction backend
    pub http: reqwest::Client,
    /// Backend base URL without a trailing slash
    pub backend_url: String,
    /// Directory the UI bundle is served from
    pub static_dir: PathBuf,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(server: &ServerConfig, backend: &BackendConfig) -> ServerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(backend.request_timeout_secs))
            .build()
            .map_err(|e| ServerError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            backend_url: backend.url.trim_end_matches('/').to_string(),
            static_dir: PathBuf::from(&server.static_dir),
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Backend URL for a request path (with query)
    pub fn backend_url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.backend_url, path_and_query)
    }
}
