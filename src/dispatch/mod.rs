//! Form Dispatch
//!
//! Turns one form submission into one request and one rendered outcome:
//!
//! ```text
//! submit(form id, fields)
//!   ├─ unknown id ──────────────► error fragment (no request)
//!   ├─ form already in flight ──► error fragment (no request)
//!   ├─ bad number input ────────► error fragment (no request)
//!   └─ POST endpoint ─┬─ 2xx ───► decode ─► result fragment (+ chart request)
//!                     └─ other ─► error fragment (server text or generic)
//! ```
//!
//! The transport is a trait so the same dispatcher runs in the browser
//! (fetch) and natively (reqwest). Everything is single-threaded; futures
//! are not `Send`.

pub mod busy;
pub mod gate;

pub use busy::{SubmitControl, BUSY_FALLBACK_MS, BUSY_LABEL};
pub use gate::{GateTicket, SubmissionGate};

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::charts::{ChartBackend, ChartSpec, CARBON_CANVAS, CHART_DRAW_DELAY_MS, ESG_CANVAS};
use crate::error::{DispatchError, DispatchResult};
use crate::forms::{FormId, FormPayload, RawField};
use crate::prediction::{ApiErrorBody, PredictionResult};
use crate::render;

/// Message shown when a failed response carries no error text
pub const GENERIC_FAILURE: &str = "Prediction failed";

/// Status and raw body of an HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> DispatchResult<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The message to show for a failed response
    pub fn failure_message(&self) -> String {
        serde_json::from_str::<ApiErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string())
    }

    /// Turn a non-success response into [`DispatchError::Http`]
    pub fn error_for_status(self) -> DispatchResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(DispatchError::Http {
                status: self.status,
                message: self.failure_message(),
            })
        }
    }
}

/// Sends JSON requests to the prediction API.
///
/// Paths are absolute API paths (`/api/predict/packaging`); the transport
/// owns the base URL. Only a failure to get any response is an `Err`.
#[async_trait(?Send)]
pub trait PredictionTransport {
    async fn post_json(&self, path: &str, body: &Value) -> DispatchResult<TransportResponse>;

    async fn get_json(&self, path: &str) -> DispatchResult<TransportResponse>;
}

/// A chart to draw once the result markup is in place
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub canvas_id: &'static str,
    pub spec: ChartSpec,
    pub delay_ms: u32,
}

impl ChartRequest {
    /// The chart that accompanies `result`, if any
    pub fn for_result(result: &PredictionResult) -> Option<Self> {
        let (canvas_id, spec) = match result {
            PredictionResult::Carbon(carbon) => {
                let breakdown = carbon.breakdown.as_ref()?;
                (CARBON_CANVAS, ChartSpec::carbon_breakdown(breakdown))
            }
            PredictionResult::Esg(esg) => (ESG_CANVAS, ChartSpec::esg_radar(&esg.esg_scores)),
            PredictionResult::Packaging(_) | PredictionResult::Products(_) => return None,
        };
        Some(Self {
            canvas_id,
            spec,
            delay_ms: CHART_DRAW_DELAY_MS,
        })
    }

    /// Draw on `backend`, replacing any chart already on the canvas
    pub fn apply(self, backend: &mut impl ChartBackend) -> bool {
        backend.draw(self.canvas_id, self.spec)
    }
}

/// Everything the page needs after one submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Element id of the result area (`packagingForm` → `packagingResult`)
    pub target: String,
    /// Fragment to place in `target`
    pub markup: String,
    pub chart: Option<ChartRequest>,
    pub outcome: DispatchResult<PredictionResult>,
}

impl Submission {
    fn failed(target: String, error: DispatchError) -> Self {
        Self {
            target,
            markup: render::error_fragment(&error.to_string()),
            chart: None,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The error text, if the submission failed
    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|e| e.to_string())
    }
}

/// Result area for a form id, following the `<name>Form` → `<name>Result`
/// naming even for forms we do not know.
pub fn result_target_for(form_id: &str) -> String {
    match FormId::from_element_id(form_id) {
        Ok(form) => form.result_target().to_string(),
        Err(_) => form_id.replacen("Form", "Result", 1),
    }
}

/// Routes form submissions to the API
pub struct Dispatcher<T> {
    transport: Rc<T>,
    gate: SubmissionGate,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            gate: self.gate.clone(),
        }
    }
}

impl<T: PredictionTransport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Rc::new(transport),
            gate: SubmissionGate::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    /// Stop waiting on `form`'s running request so the form can submit
    /// again. Called when the busy fallback expires; the old request may
    /// still settle later.
    pub fn abandon(&self, form: FormId) {
        if self.gate.release(form) {
            tracing::debug!(form = %form, "abandoned stuck submission");
        }
    }

    /// Handle a submission of the form with element id `form_id`.
    ///
    /// Never fails: every error becomes an error fragment in the returned
    /// [`Submission`].
    pub async fn submit(&self, form_id: &str, fields: &[RawField]) -> Submission {
        let target = result_target_for(form_id);

        let form = match FormId::from_element_id(form_id) {
            Ok(form) => form,
            Err(e) => {
                tracing::warn!(form = form_id, "submission from unknown form");
                return Submission::failed(target, e.into());
            }
        };

        match self.predict(form, fields).await {
            Ok(result) => Submission {
                target,
                markup: render::success_fragment(&result),
                chart: ChartRequest::for_result(&result),
                outcome: Ok(result),
            },
            Err(e) => {
                tracing::warn!(form = %form, error = %e, "prediction failed");
                Submission::failed(target, e)
            }
        }
    }

    /// Send one prediction request for `form` and decode the answer
    pub async fn predict(&self, form: FormId, fields: &[RawField]) -> DispatchResult<PredictionResult> {
        let _ticket = self.gate.try_acquire(form).ok_or(DispatchError::InFlight)?;

        let payload = FormPayload::from_fields(fields)?;
        tracing::debug!(
            form = %form,
            endpoint = form.endpoint(),
            fields = payload.len(),
            "submitting prediction"
        );

        let response = self
            .transport
            .post_json(form.endpoint(), &payload.to_json())
            .await?
            .error_for_status()?;

        PredictionResult::decode(form, response.json()?)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use crate::charts::registry::testing::RecordingEngine;
    use crate::charts::{ChartKind, ChartRegistry};
    use crate::forms::default_fields;
    use crate::render::NO_PRODUCTS_MESSAGE;
    use serde_json::json;

    #[tokio::test]
    async fn test_each_form_hits_its_endpoint() {
        let transport = ScriptedTransport::new()
            .respond("/api/predict/packaging", 200, json!({"prediction": "cardboard", "confidence": 0.9}))
            .respond("/api/predict/carbon-footprint", 200, json!({"prediction": 5.5}))
            .respond("/api/predict/product-recommendation", 200, json!({"recommendations": []}))
            .respond(
                "/api/predict/esg-score",
                200,
                json!({"esg_scores": {"e_score": 7.0, "s_score": 6.0, "g_score": 8.0, "overall_esg": 7.0}}),
            );
        let dispatcher = Dispatcher::new(transport);

        for form in FormId::ALL {
            let submission = dispatcher
                .submit(form.element_id(), &default_fields(form))
                .await;
            assert!(submission.is_success(), "{form}: {:?}", submission.outcome);
            assert_eq!(submission.target, form.result_target());
        }

        let calls = dispatcher.transport().calls.borrow();
        let paths: Vec<_> = calls.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/api/predict/packaging",
                "/api/predict/carbon-footprint",
                "/api/predict/product-recommendation",
                "/api/predict/esg-score",
            ]
        );
        assert!(calls.iter().all(|c| c.method == "POST"));
    }

    #[tokio::test]
    async fn test_payload_types() {
        let transport = ScriptedTransport::new().respond(
            "/api/predict/product-recommendation",
            200,
            json!({"recommendations": []}),
        );
        let dispatcher = Dispatcher::new(transport);

        let fields = vec![
            RawField::select("category", "food"),
            RawField::number("budget", "75"),
            RawField::checkbox("eco_priority", false),
        ];
        dispatcher.submit("productForm", &fields).await;

        let calls = dispatcher.transport().calls.borrow();
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["category"], json!("food"));
        assert_eq!(body["budget"], json!(75.0));
        assert_eq!(body["eco_priority"], json!(false));
    }

    #[tokio::test]
    async fn test_unknown_form_makes_no_request() {
        let dispatcher = Dispatcher::new(ScriptedTransport::new());

        let submission = dispatcher.submit("newsletterForm", &[]).await;

        assert!(dispatcher.transport().calls.borrow().is_empty());
        assert_eq!(submission.error_message().as_deref(), Some("Unknown form type"));
        assert!(submission.markup.contains("Unknown form type"));
        assert_eq!(submission.target, "newsletterResult");
    }

    #[tokio::test]
    async fn test_invalid_number_makes_no_request() {
        let dispatcher = Dispatcher::new(ScriptedTransport::new());

        let fields = vec![RawField::number("age", "abc")];
        let submission = dispatcher.submit("carbonForm", &fields).await;

        assert!(dispatcher.transport().calls.borrow().is_empty());
        assert_eq!(
            submission.error_message().as_deref(),
            Some("Field 'age' must be a number")
        );
        // The gate is free again
        assert!(!dispatcher.gate().is_busy(FormId::Carbon));
    }

    #[tokio::test]
    async fn test_in_flight_form_is_rejected() {
        let dispatcher = Dispatcher::new(ScriptedTransport::new());
        let _running = dispatcher.gate().try_acquire(FormId::Esg).unwrap();

        let submission = dispatcher.submit("esgForm", &default_fields(FormId::Esg)).await;

        assert_eq!(submission.outcome, Err(DispatchError::InFlight));
        assert!(dispatcher.transport().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_text() {
        let transport = ScriptedTransport::new().respond(
            "/api/predict/packaging",
            500,
            json!({"error": "Model not trained"}),
        );
        let dispatcher = Dispatcher::new(transport);

        let submission = dispatcher
            .submit("packagingForm", &default_fields(FormId::Packaging))
            .await;

        assert_eq!(
            submission.outcome,
            Err(DispatchError::Http {
                status: 500,
                message: "Model not trained".to_string()
            })
        );
        assert!(submission.markup.contains("alert-danger"));
        assert!(submission.markup.contains("Model not trained"));
    }

    #[tokio::test]
    async fn test_generic_error_without_server_text() {
        let transport = ScriptedTransport::new()
            .respond_raw("/api/predict/packaging", 502, "<html>Bad Gateway</html>")
            .respond("/api/predict/packaging", 400, json!({"detail": "nope"}));
        let dispatcher = Dispatcher::new(transport);
        let fields = default_fields(FormId::Packaging);

        let first = dispatcher.submit("packagingForm", &fields).await;
        assert_eq!(first.error_message().as_deref(), Some(GENERIC_FAILURE));

        let second = dispatcher.submit("packagingForm", &fields).await;
        assert_eq!(second.error_message().as_deref(), Some(GENERIC_FAILURE));
    }

    #[tokio::test]
    async fn test_transport_and_decode_failures() {
        let transport = ScriptedTransport::new().respond_raw("/api/predict/esg-score", 200, "not json");
        let dispatcher = Dispatcher::new(transport);
        let fields = default_fields(FormId::Esg);

        let decode = dispatcher.submit("esgForm", &fields).await;
        assert!(matches!(decode.outcome, Err(DispatchError::Decode(_))));

        // Queue is now empty, so the transport fails outright
        let network = dispatcher.submit("esgForm", &fields).await;
        assert!(matches!(network.outcome, Err(DispatchError::Transport(_))));
        assert!(network.markup.contains("Network error"));
    }

    #[tokio::test]
    async fn test_carbon_breakdown_schedules_chart() {
        let transport = ScriptedTransport::new()
            .respond(
                "/api/predict/carbon-footprint",
                200,
                json!({"prediction": 4.0, "breakdown": {"transport": 2.0, "housing": 1.0, "food": 1.0}}),
            )
            .respond("/api/predict/carbon-footprint", 200, json!({"prediction": 4.0}));
        let dispatcher = Dispatcher::new(transport);
        let fields = default_fields(FormId::Carbon);

        let with_breakdown = dispatcher.submit("carbonForm", &fields).await;
        let chart = with_breakdown.chart.clone().unwrap();
        assert_eq!(chart.canvas_id, CARBON_CANVAS);
        assert_eq!(chart.delay_ms, 100);
        assert_eq!(
            chart.spec.point_label(0, 0).as_deref(),
            Some("Transport: 2.00 tons (50.0%)")
        );

        let without = dispatcher.submit("carbonForm", &fields).await;
        assert!(without.is_success());
        assert!(without.chart.is_none());
    }

    #[tokio::test]
    async fn test_esg_chart_applies_to_backend() {
        let transport = ScriptedTransport::new().respond(
            "/api/predict/esg-score",
            200,
            json!({"esg_scores": {"e_score": 7.0, "s_score": 6.0, "g_score": 8.0, "overall_esg": 7.0}}),
        );
        let dispatcher = Dispatcher::new(transport);

        let submission = dispatcher.submit("esgForm", &default_fields(FormId::Esg)).await;

        let engine = RecordingEngine::with_canvases(&[ESG_CANVAS]);
        let journal = engine.journal.clone();
        let mut charts = ChartRegistry::new(engine);
        assert!(submission.chart.unwrap().apply(&mut charts));
        assert_eq!(
            journal.borrow().created,
            vec![(ESG_CANVAS.to_string(), ChartKind::Radar)]
        );
    }

    #[tokio::test]
    async fn test_empty_recommendations() {
        let transport = ScriptedTransport::new().respond(
            "/api/predict/product-recommendation",
            200,
            json!({"recommendations": []}),
        );
        let dispatcher = Dispatcher::new(transport);

        let submission = dispatcher
            .submit("productForm", &default_fields(FormId::Product))
            .await;
        assert!(submission.markup.contains(NO_PRODUCTS_MESSAGE));
        assert!(submission.chart.is_none());
    }

    /// Never answers its first request; answers later ones from `inner`
    struct StallOnce {
        stalled: std::cell::Cell<bool>,
        inner: ScriptedTransport,
    }

    #[async_trait(?Send)]
    impl PredictionTransport for StallOnce {
        async fn post_json(&self, path: &str, body: &Value) -> DispatchResult<TransportResponse> {
            if !self.stalled.replace(true) {
                std::future::pending::<()>().await;
            }
            self.inner.post_json(path, body).await
        }

        async fn get_json(&self, path: &str) -> DispatchResult<TransportResponse> {
            self.inner.get_json(path).await
        }
    }

    #[tokio::test]
    async fn test_resubmit_after_busy_fallback() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let dispatcher = Dispatcher::new(StallOnce {
                    stalled: std::cell::Cell::new(false),
                    inner: ScriptedTransport::new().respond(
                        "/api/predict/carbon-footprint",
                        200,
                        json!({"prediction": 4.2}),
                    ),
                });
                let fields = default_fields(FormId::Carbon);

                let first = dispatcher.clone();
                let first_fields = fields.clone();
                let stuck = tokio::task::spawn_local(async move {
                    first.submit("carbonForm", &first_fields).await
                });
                for _ in 0..10 {
                    if dispatcher.gate().is_busy(FormId::Carbon) {
                        break;
                    }
                    tokio::task::yield_now().await;
                }
                assert!(dispatcher.gate().is_busy(FormId::Carbon));

                // Fallback window passes with the first request still pending
                let mut control = SubmitControl::new("Calculate Footprint");
                control.show_busy(0.0);
                assert!(control.restore_if_expired(f64::from(BUSY_FALLBACK_MS)));
                dispatcher.abandon(FormId::Carbon);

                let second = dispatcher.submit("carbonForm", &fields).await;
                assert!(second.is_success(), "{:?}", second.outcome);

                // The stuck request going away later must not free a newer claim
                let _current = dispatcher.gate().try_acquire(FormId::Carbon).unwrap();
                stuck.abort();
                assert!(stuck.await.is_err());
                assert!(dispatcher.gate().is_busy(FormId::Carbon));
            })
            .await;
    }

    #[test]
    fn test_result_target_for_unknown_ids() {
        assert_eq!(result_target_for("esgForm"), "esgResult");
        assert_eq!(result_target_for("contactForm"), "contactResult");
        assert_eq!(result_target_for("search"), "search");
    }
}
