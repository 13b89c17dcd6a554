//! Toast Notification Component
//!
//! Shows success and error messages.

use leptos::*;

use crate::state::global::GlobalState;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let state_for_close = state.clone();

    view! {
        <div class="toast-stack">
            // Success toast
            {move || {
                state.success.get().map(|msg| view! {
                    <ToastMessage message=msg variant=ToastVariant::Success />
                })
            }}

            // Error toast
            {move || {
                let state = state_for_close.clone();
                state.error.get().map(|msg| view! {
                    <ToastMessage
                        message=msg
                        variant=ToastVariant::Error
                        on_close=Callback::new(move |_| state.clear_error())
                    />
                })
            }}
        </div>
    }
}

#[derive(Clone, Copy)]
enum ToastVariant {
    Success,
    Error,
}

#[component]
fn ToastMessage(
    #[prop(into)]
    message: String,
    variant: ToastVariant,
    #[prop(optional)]
    on_close: Option<Callback<()>>,
) -> impl IntoView {
    let (icon, alert_class) = match variant {
        ToastVariant::Success => ("fas fa-check-circle", "alert-success"),
        ToastVariant::Error => ("fas fa-exclamation-circle", "alert-danger"),
    };

    view! {
        <div class=format!("alert {} alert-dismissible shadow mb-2", alert_class) role="alert">
            <i class=format!("{} me-2", icon) />
            {message}
            {on_close.map(|on_close| view! {
                <button type="button" class="btn-close" on:click=move |_| on_close.call(()) />
            })}
        </div>
    }
}
