//! EcoInsight dev host
//!
//! Serves the compiled UI bundle and forwards API calls to the prediction
//! backend, so the page and its API share one origin.
//!
//! # Endpoints
//!
//! ## API (forwarded)
//! - `POST /api/predict/packaging`
//! - `POST /api/predict/carbon-footprint`
//! - `POST /api/predict/product-recommendation`
//! - `POST /api/predict/esg-score`
//! - `GET /api/models/status`
//! - `POST /api/models/train`
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Backend reachable
//! - `GET /health` - Full health status
//!
//! Everything else is a file from the UI bundle, with `index.html` as the
//! fallback so client-side routes (`/dashboard`) load the app.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Build the host router with all routes and middleware
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let index = state.static_dir.join("index.html");
    let bundle = ServeDir::new(&state.static_dir).fallback(ServeFile::new(index));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/api/*path", any(routes::proxy::forward))
        .nest("/health", health_routes)
        .fallback_service(bundle)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(shared_state)
}

/// Same-origin by default; listed origins may call the API cross-origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the host
pub async fn serve(state: AppState, config: &ServerConfig) -> ServerResult<()> {
    let backend = state.backend_url.clone();
    let router = build_router(state, config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("EcoInsight listening on http://{}", addr);
    tracing::info!("Forwarding /api to {}", backend);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("EcoInsight shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
