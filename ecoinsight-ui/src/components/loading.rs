//! Loading Component
//!
//! Spinners and placeholders while data is in flight.

use leptos::*;

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="spinner-border spinner-border-sm" role="status" />
    }
}

/// Placeholder rows for a list that has not loaded yet
#[component]
pub fn ListSkeleton(
    #[prop(default = 3)]
    count: usize,
) -> impl IntoView {
    view! {
        <div class="placeholder-glow">
            {(0..count).map(|_| view! {
                <span class="placeholder col-12 mb-2" />
            }).collect_view()}
        </div>
    }
}
