//! Navigation Component
//!
//! Header navigation bar, plus the in-page section links that scroll
//! smoothly instead of jumping.

use leptos::*;
use leptos_router::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use ecoinsight::FormId;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="navbar navbar-expand navbar-dark bg-dark border-bottom border-secondary">
            <div class="container">
                // Logo and brand
                <A href="/" class="navbar-brand">
                    <i class="fas fa-seedling me-2 text-success" />
                    "EcoInsight"
                </A>

                // Navigation links
                <div class="navbar-nav">
                    <NavLink href="/" label="Predictions" />
                    <NavLink href="/dashboard" label="Dashboard" />
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A href=href class="nav-link" active_class="active">
            {label}
        </A>
    }
}

/// Jump links to each prediction form on the page
#[component]
pub fn SectionLinks() -> impl IntoView {
    view! {
        <div class="d-flex flex-wrap gap-2 mb-4">
            {FormId::ALL.into_iter().map(|form| {
                let target = format!("predict-{}", form.slug());
                view! {
                    <a
                        href=format!("#{}", target)
                        class="btn btn-outline-light btn-sm"
                        on:click=move |ev| {
                            ev.prevent_default();
                            scroll_to_id(&target);
                        }
                    >
                        {form.title()}
                    </a>
                }
            }).collect_view()}
        </div>
    }
}

/// Scroll `element` into view with a smooth animation
pub fn smooth_scroll(element: &web_sys::Element, block: ScrollLogicalPosition) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(block);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

fn scroll_to_id(id: &str) {
    if let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        smooth_scroll(&element, ScrollLogicalPosition::Start);
    }
}
