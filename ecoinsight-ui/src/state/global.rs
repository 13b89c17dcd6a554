//! Global Application State
//!
//! Reactive state management using Leptos signals. The dispatcher and the
//! chart registry live here so every form and page shares one submission
//! gate and one set of canvas bindings.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use ecoinsight::charts::{ChartBackend, ChartRegistry};
use ecoinsight::dispatch::{ChartRequest, Dispatcher};
use ecoinsight::status::{self, StatusSnapshot};
use ecoinsight::ModelKind;

use crate::api::BrowserTransport;
use crate::components::chart::{install_resize_handler, CanvasEngine};

/// How long a toast stays up
pub const TOAST_DISMISS_MS: u32 = 5_000;

/// Shared chart bindings
pub type Charts = Rc<RefCell<ChartRegistry<CanvasEngine>>>;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Last fetched model status; `None` until the first fetch succeeds
    pub model_status: RwSignal<Option<StatusSnapshot>>,
    /// The first status fetch has settled, whether or not it succeeded
    pub status_checked: RwSignal<bool>,
    /// A training request is running
    pub training: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    pub dispatcher: Dispatcher<BrowserTransport>,
    pub charts: Charts,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let charts: Charts = Rc::new(RefCell::new(ChartRegistry::new(CanvasEngine)));
    install_resize_handler(Rc::clone(&charts));

    let state = GlobalState {
        model_status: create_rw_signal(None),
        status_checked: create_rw_signal(false),
        training: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
        dispatcher: Dispatcher::new(BrowserTransport::from_storage()),
        charts,
    };

    provide_context(state);
}

impl GlobalState {
    /// Fetch the model status map. Failures are only logged.
    pub fn refresh_status(&self) {
        let state = self.clone();
        spawn_local(async move {
            match status::fetch_status(state.dispatcher.transport()).await {
                Ok(snapshot) => state.model_status.set(Some(snapshot)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Error checking model status: {}", e).into());
                }
            }
            state.status_checked.set(true);
        });
    }

    /// Ask the backend to train `model` (all models when `None`)
    pub fn train(&self, model: Option<ModelKind>) {
        if self.training.get_untracked() {
            return;
        }
        self.training.set(true);

        let state = self.clone();
        spawn_local(async move {
            match status::request_training(state.dispatcher.transport(), model).await {
                Ok(ack) => {
                    state.show_success(&ack.message);
                    state.refresh_status();
                }
                Err(e) => state.show_error(&format!("Training failed: {}", e)),
            }
            state.training.set(false);
        });
    }

    /// Draw a result chart once its canvas has been laid out
    pub fn draw_later(&self, request: ChartRequest) {
        let charts = Rc::clone(&self.charts);
        gloo_timers::callback::Timeout::new(request.delay_ms, move || {
            if !request.apply(&mut *charts.borrow_mut()) {
                web_sys::console::warn_1(&"Chart canvas not found, skipping chart".into());
            }
        })
        .forget();
    }

    /// Release every bound chart
    pub fn destroy_charts(&self) {
        self.charts.borrow_mut().destroy_all();
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(TOAST_DISMISS_MS, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(TOAST_DISMISS_MS, move || {
            error_signal.set(None);
        })
        .forget();
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }
}
