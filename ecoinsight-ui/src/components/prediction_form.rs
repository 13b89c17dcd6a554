//! Prediction Form Component
//!
//! One card per prediction model. Fields come from the form schema; submit
//! runs native validity first, then hands the values to the dispatcher and
//! places the returned fragment in the form's result area.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::ScrollLogicalPosition;

use ecoinsight::dispatch::{SubmitControl, BUSY_FALLBACK_MS};
use ecoinsight::forms::{validate_fields, FieldKind, FieldSpec, FormId, RawField};

use crate::components::chart::ChartCanvas;
use crate::components::nav::smooth_scroll;
use crate::state::global::GlobalState;

const SUBMIT_LABEL: &str = "Get Prediction";

/// Reactive state of one input
#[derive(Clone, Copy)]
struct FieldState {
    spec: &'static FieldSpec,
    /// Input value; checkboxes hold `"on"` or `""`
    value: RwSignal<String>,
    error: RwSignal<Option<String>>,
}

impl FieldState {
    fn new(spec: &'static FieldSpec) -> Self {
        Self {
            spec,
            value: create_rw_signal(spec.default.to_string()),
            error: create_rw_signal(None),
        }
    }

    fn raw(&self, form: FormId) -> RawField {
        RawField::from_schema(form, self.spec.name, &self.value.get_untracked())
    }

    /// Validate and show or clear the inline message
    fn check(&self, form: FormId) -> bool {
        match self.spec.validate(&self.raw(form)) {
            Ok(()) => {
                self.error.set(None);
                true
            }
            Err(e) => {
                self.error.set(Some(e.to_string()));
                false
            }
        }
    }
}

fn input_id(form: FormId, field: &str) -> String {
    format!("{}-{}", form.slug(), field)
}

/// `public_transport` → `Public Transport`
fn option_label(option: &str) -> String {
    option
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn form_icon(form: FormId) -> &'static str {
    match form {
        FormId::Packaging => "fas fa-box",
        FormId::Carbon => "fas fa-leaf",
        FormId::Product => "fas fa-shopping-cart",
        FormId::Esg => "fas fa-chart-bar",
    }
}

fn focus_element(element: web_sys::Element) {
    if let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() {
        let _ = element.focus();
    }
}

fn focus_by_id(id: &str) {
    if let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        focus_element(element);
    }
}

/// Prediction form card with its result area
#[component]
pub fn PredictionForm(
    form: FormId,
    /// Canvas shown under the result (carbon and ESG forms)
    #[prop(optional)]
    chart: Option<&'static str>,
    #[prop(optional)]
    chart_height: Option<u32>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let form_ref = create_node_ref::<html::Form>();
    let result_ref = create_node_ref::<html::Div>();
    let control = create_rw_signal(SubmitControl::new(SUBMIT_LABEL));
    let fields = store_value(
        form.fields()
            .iter()
            .map(FieldState::new)
            .collect::<Vec<_>>(),
    );

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(element) = form_ref.get_untracked() else {
            return;
        };

        if !element.check_validity() {
            fields.with_value(|fields| {
                for field in fields {
                    field.check(form);
                }
            });
            if let Ok(Some(invalid)) = element.query_selector(":invalid") {
                focus_element(invalid);
            }
            return;
        }

        let raw: Vec<RawField> = fields.with_value(|fields| fields.iter().map(|f| f.raw(form)).collect());
        if let Err(e) = validate_fields(form, &raw) {
            if let Some(name) = e.field() {
                fields.with_value(|fields| {
                    if let Some(field) = fields.iter().find(|f| f.spec.name == name) {
                        field.error.set(Some(e.to_string()));
                    }
                });
                focus_by_id(&input_id(form, name));
            }
            return;
        }

        control.update(|c| c.show_busy(js_sys::Date::now()));
        // Gives the form back even if the request never settles
        let dispatcher = state.dispatcher.clone();
        let fallback = gloo_timers::callback::Timeout::new(BUSY_FALLBACK_MS, move || {
            control.update(SubmitControl::restore);
            dispatcher.abandon(form);
        });

        let state = state.clone();
        spawn_local(async move {
            let submission = state.dispatcher.submit(form.element_id(), &raw).await;
            drop(fallback);
            control.update(SubmitControl::restore);

            if let Some(result) = result_ref.get_untracked() {
                result.set_inner_html(&submission.markup);
                smooth_scroll(&result, ScrollLogicalPosition::Nearest);
            }
            if let Some(chart) = submission.chart {
                state.draw_later(chart);
            }
        });
    };

    view! {
        <div class="card h-100" id=format!("predict-{}", form.slug())>
            <div class="card-header">
                <h5 class="mb-0">
                    <i class=format!("{} me-2", form_icon(form)) />
                    {form.title()}
                </h5>
            </div>
            <div class="card-body">
                <form id=form.element_id() node_ref=form_ref on:submit=on_submit>
                    {fields.with_value(|fields| {
                        fields.iter().map(|field| view! { <Field form=form field=*field /> }).collect_view()
                    })}

                    <button
                        type="submit"
                        class="btn btn-success w-100"
                        disabled=move || control.with(SubmitControl::is_disabled)
                    >
                        {move || control.with(|c| c.is_busy()).then(|| view! {
                            <i class="fas fa-spinner fa-spin me-2" />
                        })}
                        {move || control.with(|c| c.label().to_string())}
                    </button>
                </form>

                <div id=form.result_target() class="mt-3" node_ref=result_ref />

                {chart.map(|id| view! {
                    <div class="mt-3">
                        <ChartCanvas id=id height=chart_height.unwrap_or(300) />
                    </div>
                })}
            </div>
        </div>
    }
}

/// One schema-driven input with its inline message
#[component]
fn Field(form: FormId, field: FieldState) -> impl IntoView {
    let spec = field.spec;
    let id = input_id(form, spec.name);
    let label_for = id.clone();

    let on_blur = move |_| {
        field.check(form);
    };
    let on_change = move |value: String| {
        field.value.set(value);
        if field.error.get_untracked().is_some() {
            field.check(form);
        }
    };

    let input_class = move |base: &'static str| {
        move || {
            if field.error.get().is_some() {
                format!("{} is-invalid", base)
            } else {
                base.to_string()
            }
        }
    };

    let message = move || {
        field.error.get().map(|msg| view! {
            <div class="invalid-feedback d-block">{msg}</div>
        })
    };

    match spec.kind {
        FieldKind::Number { min, max, step } => view! {
            <div class="mb-3">
                <label for=label_for class="form-label">{spec.label}</label>
                <input
                    type="number"
                    id=id
                    name=spec.name
                    class=input_class("form-control")
                    step=step.to_string()
                    min=min.map(|m| m.to_string())
                    max=max.map(|m| m.to_string())
                    required=spec.required
                    prop:value=move || field.value.get()
                    on:input=move |ev| on_change(event_target_value(&ev))
                    on:blur=on_blur
                />
                {message}
            </div>
        }
        .into_view(),

        FieldKind::Select(options) => view! {
            <div class="mb-3">
                <label for=label_for class="form-label">{spec.label}</label>
                <select
                    id=id
                    name=spec.name
                    class=input_class("form-select")
                    required=spec.required
                    on:change=move |ev| on_change(event_target_value(&ev))
                    on:blur=on_blur
                >
                    {options.iter().map(|option| view! {
                        <option value=*option selected={*option == spec.default}>
                            {option_label(option)}
                        </option>
                    }).collect_view()}
                </select>
                {message}
            </div>
        }
        .into_view(),

        FieldKind::Checkbox => view! {
            <div class="form-check mb-3">
                <input
                    type="checkbox"
                    id=id
                    name=spec.name
                    class="form-check-input"
                    prop:checked=move || !field.value.get().is_empty()
                    on:change=move |ev| {
                        let value = if event_target_checked(&ev) { "on" } else { "" };
                        field.value.set(value.to_string());
                    }
                />
                <label for=label_for class="form-check-label">{spec.label}</label>
            </div>
        }
        .into_view(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_label() {
        assert_eq!(option_label("public_transport"), "Public Transport");
        assert_eq!(option_label("urban"), "Urban");
        assert_eq!(option_label(""), "");
    }

    #[test]
    fn test_input_id() {
        assert_eq!(input_id(FormId::Carbon, "age"), "carbon-age");
    }
}
