//! Pages
//!
//! Top-level page components for each route.

pub mod predictions;
pub mod dashboard;

pub use predictions::Predictions;
pub use dashboard::Dashboard;
