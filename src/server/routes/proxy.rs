//! API forwarding
//!
//! `/api/*` is relayed to the prediction backend unchanged: method, path,
//! query, `Content-Type` and body go out; status, `Content-Type` and body
//! come back. Backend error statuses pass through as-is so the page sees the
//! backend's own `{"error": ...}` text.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;

/// ANY /api/*path
pub async fn forward(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let url = state.backend_url_for(path_and_query);

    // reqwest and axum sit on different `http` major versions
    let outgoing = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let mut request = state.http.request(outgoing, &url);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        request = request.header("content-type", content_type);
    }
    if !body.is_empty() {
        request = request.body(body.to_vec());
    }

    tracing::debug!(%method, %url, "forwarding to backend");

    let response = request
        .send()
        .await
        .map_err(|e| ServerError::BadGateway(e.to_string()))?;

    let status = StatusCode::from_u16(response.status().as_u16())
        .map_err(|e| ServerError::BadGateway(e.to_string()))?;
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| HeaderValue::from_str(v).ok());
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ServerError::BadGateway(e.to_string()))?;

    if !status.is_success() {
        tracing::warn!(%status, %url, "backend returned an error status");
    }

    let mut reply = (status, bytes.to_vec()).into_response();
    if let Some(content_type) = content_type {
        reply.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(reply)
}
