//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::components::model_status::status_summary;
use crate::components::{Nav, Toast};
use crate::pages::{Dashboard, Predictions};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    // Model status is fetched once per page load
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    state.refresh_status();

    view! {
        <Router>
            <div class="min-vh-100 d-flex flex-column">
                // Navigation header
                <Nav />

                // Main content area
                <main class="container flex-grow-1 py-4">
                    <Routes>
                        <Route path="/" view=Predictions />
                        <Route path="/dashboard" view=Dashboard />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                // Footer with model status
                <Footer />

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Footer component showing model status
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let snapshot = state.model_status;

    view! {
        <footer class="border-top border-secondary py-3">
            <div class="container d-flex justify-content-between small text-body-secondary">
                <span>
                    <i class="fas fa-seedling me-1" />
                    {format!("EcoInsight v{}", ecoinsight::VERSION)}
                </span>

                // Models trained
                <span>{move || status_summary(&state)}</span>

                // Last status fetch
                <span>
                    {move || {
                        snapshot.with(|s| {
                            s.as_ref()
                                .map(|s| format!("Status as of {}", s.fetched_at.format("%H:%M:%S")))
                                .unwrap_or_else(|| "Status not loaded".to_string())
                        })
                    }}
                </span>
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="d-flex flex-column align-items-center justify-content-center text-center py-5">
            <i class="fas fa-search fa-3x mb-3 text-body-secondary" />
            <h1 class="h3 mb-2">"Page Not Found"</h1>
            <p class="text-body-secondary mb-4">"The page you're looking for doesn't exist."</p>
            <A href="/" class="btn btn-success">
                "Go to Predictions"
            </A>
        </div>
    }
}
