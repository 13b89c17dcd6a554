//! Model Status Component
//!
//! One row per model with its status label and indicator dot, and a button
//! that starts training.

use leptos::*;

use ecoinsight::status::{status_element_id, status_rows, ModelStatus};
use ecoinsight::ModelKind;

use crate::components::loading::{InlineLoading, ListSkeleton};
use crate::state::global::GlobalState;

/// Status list for every model
///
/// Shows a skeleton until the first fetch settles. If it failed, every row
/// reads UNKNOWN.
#[component]
pub fn ModelStatusList() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let snapshot = state.model_status;
    let checked = state.status_checked;

    view! {
        <ul class="list-group list-group-flush">
            {move || {
                if snapshot.with(Option::is_none) && !checked.get() {
                    return view! { <li class="list-group-item"><ListSkeleton count=4 /></li> }.into_view();
                }
                snapshot.with(|s| status_rows(s.as_ref()))
                    .into_iter()
                    .map(|(model, status)| view! { <ModelStatusRow model=model status=status /> })
                    .collect_view()
            }}
        </ul>
    }
}

#[component]
fn ModelStatusRow(model: ModelKind, status: ModelStatus) -> impl IntoView {
    view! {
        <li class="list-group-item d-flex justify-content-between align-items-center">
            <span>{model.display_name()}</span>
            <span id=status_element_id(model.as_str()) class="small fw-semibold">
                {status.label()}
                <span class=status.indicator_class() />
            </span>
        </li>
    }
}

/// Starts training of every model
#[component]
pub fn TrainButton() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let training = state.training;

    view! {
        <button
            class="btn btn-outline-success"
            disabled=move || training.get()
            on:click=move |_| state.train(None)
        >
            {move || if training.get() {
                view! { <InlineLoading /> " Training..." }.into_view()
            } else {
                view! { <i class="fas fa-cogs me-2" /> "Train Models" }.into_view()
            }}
        </button>
    }
}

/// `3 of 4 models trained`, or a notice when status is unknown
pub fn status_summary(state: &GlobalState) -> String {
    state.model_status.with(|snapshot| match snapshot {
        Some(s) if !s.is_empty() => format!(
            "{} of {} models trained",
            s.trained_count(),
            s.models.len()
        ),
        _ => "Model status unavailable".to_string(),
    })
}
