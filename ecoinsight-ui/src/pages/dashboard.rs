//! Dashboard Page
//!
//! Model status, the training trigger and the overview charts. The charts
//! use the built-in sample series until the backend reports real numbers,
//! and say so.

use leptos::*;

use ecoinsight::charts::{ChartBackend, ChartData, TrendData, CHART_DRAW_DELAY_MS};

use crate::components::{ChartCanvas, ModelStatusList, TrainButton};
use crate::state::global::GlobalState;

pub const PERFORMANCE_CANVAS: &str = "performanceChart";
pub const USAGE_CANVAS: &str = "usageChart";
pub const TRENDS_CANVAS: &str = "trendsChart";

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let performance = ChartData::default();
    let usage = ChartData::default();
    let trends = TrendData::default();
    let sample = performance.is_sample() || usage.is_sample() || trends.is_sample();

    // Draw once the canvases are mounted
    let charts = state.charts.clone();
    gloo_timers::callback::Timeout::new(CHART_DRAW_DELAY_MS, move || {
        let mut charts = charts.borrow_mut();
        charts.draw_performance(PERFORMANCE_CANVAS, &performance);
        charts.draw_usage(USAGE_CANVAS, &usage);
        charts.draw_trends(TRENDS_CANVAS, &trends);
    })
    .forget();

    let state_for_cleanup = state.clone();
    on_cleanup(move || state_for_cleanup.destroy_charts());

    view! {
        <div>
            // Page header
            <div class="d-flex align-items-center justify-content-between mb-4">
                <div>
                    <h1 class="h3">"Dashboard"</h1>
                    <p class="text-body-secondary mb-0">"Model health and usage at a glance"</p>
                </div>
                <TrainButton />
            </div>

            <div class="row g-4">
                <div class="col-lg-4">
                    <div class="card h-100">
                        <div class="card-header">
                            <h5 class="mb-0">"Model Status"</h5>
                        </div>
                        <ModelStatusList />
                    </div>
                </div>

                <div class="col-lg-8">
                    <ChartCard title="Model Performance" sample=sample>
                        <ChartCanvas id=PERFORMANCE_CANVAS height=300 />
                    </ChartCard>
                </div>

                <div class="col-lg-5">
                    <ChartCard title="Usage by Model" sample=sample>
                        <ChartCanvas id=USAGE_CANVAS height=300 />
                    </ChartCard>
                </div>

                <div class="col-lg-7">
                    <ChartCard title="Carbon Footprint Trends" sample=sample>
                        <ChartCanvas id=TRENDS_CANVAS height=300 />
                    </ChartCard>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ChartCard(
    title: &'static str,
    /// Show the sample-data badge
    sample: bool,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="card h-100">
            <div class="card-header d-flex justify-content-between align-items-center">
                <h5 class="mb-0">{title}</h5>
                {sample.then(|| view! {
                    <span class="badge text-bg-secondary" title="Demo values, not live metrics">
                        "Sample data"
                    </span>
                })}
            </div>
            <div class="card-body">
                {children()}
            </div>
        </div>
    }
}
