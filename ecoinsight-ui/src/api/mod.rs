//! API access
//!
//! Browser transport for the prediction endpoints.

pub mod client;

pub use client::BrowserTransport;
