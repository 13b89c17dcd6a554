//! EcoInsight Dashboard
//!
//! Sustainability analytics frontend built with Leptos (WASM).
//!
//! # Features
//!
//! - Packaging, carbon footprint, product and ESG prediction forms
//! - Result cards with breakdown doughnut and ESG radar charts
//! - Model status indicators and training trigger
//! - Dashboard with performance, usage and trend charts
//!
//! # Architecture
//!
//! A client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Form handling, result markup and chart specs come from the `ecoinsight`
//! core; this crate supplies the browser transport (`gloo-net`) and the
//! canvas chart engine.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
