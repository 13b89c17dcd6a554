//! Predictions Page
//!
//! The four prediction forms. Carbon and ESG cards carry the canvases their
//! result charts are drawn on.

use leptos::*;

use ecoinsight::charts::{CARBON_CANVAS, ESG_CANVAS};
use ecoinsight::FormId;

use crate::components::{PredictionForm, SectionLinks};
use crate::state::global::GlobalState;

/// Predictions page component
#[component]
pub fn Predictions() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Result charts are bound to this page's canvases
    on_cleanup(move || state.destroy_charts());

    view! {
        <div>
            // Page header
            <div class="mb-4">
                <h1 class="h3">"Sustainability Predictions"</h1>
                <p class="text-body-secondary mb-3">
                    "Packaging, carbon footprint, product and ESG models"
                </p>
                <SectionLinks />
            </div>

            <div class="row g-4">
                <div class="col-lg-6">
                    <PredictionForm form=FormId::Packaging />
                </div>
                <div class="col-lg-6">
                    <PredictionForm form=FormId::Carbon chart=CARBON_CANVAS chart_height=300 />
                </div>
                <div class="col-lg-6">
                    <PredictionForm form=FormId::Product />
                </div>
                <div class="col-lg-6">
                    <PredictionForm form=FormId::Esg chart=ESG_CANVAS chart_height=400 />
                </div>
            </div>
        </div>
    }
}
