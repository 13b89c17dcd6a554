//! # EcoInsight
//!
//! Sustainability Analytics - the presentation layer for four prediction
//! models (packaging recommendation, carbon footprint, product
//! recommendation, ESG scoring).
//!
//! ## Features
//!
//! - **Form dispatch**: one request per submission, routed by form identity
//! - **Result rendering**: HTML fragments for every prediction kind
//! - **Charts**: doughnut, radar, bar, pie and line specs behind a swappable
//!   engine, at most one live chart per canvas
//! - **Dev host** (`server` feature): serves the UI and forwards `/api`
//!
//! ## Modules
//!
//! - [`forms`]: form identities, field schemas, payload coercion
//! - [`dispatch`]: submit → request → rendered outcome
//! - [`render`]: result and error fragments
//! - [`charts`]: chart specs, geometry and the canvas registry
//! - [`status`]: model status snapshot and training trigger
//!
//! The core builds for `wasm32-unknown-unknown` with default features off;
//! the browser UI supplies its own transport and chart engine.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecoinsight::client::HttpTransport;
//! use ecoinsight::dispatch::Dispatcher;
//! use ecoinsight::forms::{default_fields, FormId};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new("http://localhost:5000", Duration::from_secs(30))?;
//!     let dispatcher = Dispatcher::new(transport);
//!
//!     let submission = dispatcher
//!         .submit("carbonForm", &default_fields(FormId::Carbon))
//!         .await;
//!     println!("{}", submission.markup);
//!
//!     Ok(())
//! }
//! ```

pub mod charts;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod forms;
pub mod prediction;
pub mod render;
pub mod status;

#[cfg(feature = "server")]
pub mod client;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod logging;
#[cfg(feature = "server")]
pub mod server;

pub use error::{DispatchError, DispatchResult, FormError};
pub use forms::{FormId, ModelKind};
pub use prediction::PredictionResult;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
