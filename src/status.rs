//! Model Status
//!
//! Read-only view of the backend's model status map, plus the training
//! trigger. A snapshot is replaced wholesale on every fetch; nothing here
//! mutates it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dispatch::PredictionTransport;
use crate::error::DispatchResult;
use crate::forms::ModelKind;

pub const STATUS_PATH: &str = "/api/models/status";
pub const TRAIN_PATH: &str = "/api/models/train";

/// Status tag reported for one model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ModelStatus {
    NotTrained,
    Training,
    Trained,
    Error,
    /// A tag this client does not know; shown as-is
    Other(String),
}

impl ModelStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ModelStatus::NotTrained => "not_trained",
            ModelStatus::Training => "training",
            ModelStatus::Trained => "trained",
            ModelStatus::Error => "error",
            ModelStatus::Other(tag) => tag,
        }
    }

    /// Text for the status element: `not_trained` → `NOT TRAINED`
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }

    /// Class list of the indicator dot next to the label
    pub fn indicator_class(&self) -> String {
        format!("status-indicator ms-2 status-{}", self.as_str())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelStatus::Trained)
    }
}

impl From<String> for ModelStatus {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "not_trained" => ModelStatus::NotTrained,
            "training" => ModelStatus::Training,
            "trained" => ModelStatus::Trained,
            "error" => ModelStatus::Error,
            _ => ModelStatus::Other(tag),
        }
    }
}

impl From<ModelStatus> for String {
    fn from(status: ModelStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag shown for every model when no status could be fetched
pub const UNKNOWN_TAG: &str = "unknown";

/// One row per model for the status list.
///
/// Models the snapshot does not mention are not trained. Without a snapshot
/// every model is shown as [`UNKNOWN_TAG`].
pub fn status_rows(snapshot: Option<&StatusSnapshot>) -> Vec<(ModelKind, ModelStatus)> {
    ModelKind::ALL
        .into_iter()
        .map(|model| {
            let status = match snapshot {
                Some(s) => s.get(model).cloned().unwrap_or(ModelStatus::NotTrained),
                None => ModelStatus::Other(UNKNOWN_TAG.to_string()),
            };
            (model, status)
        })
        .collect()
}

/// Element id that displays a model's status (`packagingStatus`)
pub fn status_element_id(model: &str) -> String {
    format!("{}Status", model)
}

/// The model status map as last fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub models: BTreeMap<String, ModelStatus>,
    pub fetched_at: DateTime<Utc>,
}

impl StatusSnapshot {
    pub fn new(models: BTreeMap<String, ModelStatus>) -> Self {
        Self {
            models,
            fetched_at: Utc::now(),
        }
    }

    pub fn get(&self, model: ModelKind) -> Option<&ModelStatus> {
        self.models.get(model.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelStatus)> {
        self.models.iter().map(|(name, status)| (name.as_str(), status))
    }

    /// Number of models reported as trained
    pub fn trained_count(&self) -> usize {
        self.models.values().filter(|s| s.is_ready()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Fetch the current status map
pub async fn fetch_status<T: PredictionTransport + ?Sized>(transport: &T) -> DispatchResult<StatusSnapshot> {
    let response = transport.get_json(STATUS_PATH).await?.error_for_status()?;
    let models: BTreeMap<String, ModelStatus> = serde_json::from_str(&response.body)?;
    tracing::debug!(models = models.len(), "fetched model status");
    Ok(StatusSnapshot::new(models))
}

/// Backend acknowledgement of a training request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainingAck {
    pub message: String,
    pub status: ModelStatus,
}

/// Ask the backend to train one model, or every model when `model` is `None`
pub async fn request_training<T: PredictionTransport + ?Sized>(
    transport: &T,
    model: Option<ModelKind>,
) -> DispatchResult<TrainingAck> {
    let model_type = model.map(|m| m.as_str()).unwrap_or("all");
    tracing::info!(model_type, "requesting model training");

    let response = transport
        .post_json(TRAIN_PATH, &json!({ "model_type": model_type }))
        .await?
        .error_for_status()?;
    Ok(serde_json::from_str(&response.body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::ScriptedTransport;
    use crate::error::DispatchError;

    #[test]
    fn test_labels() {
        assert_eq!(ModelStatus::NotTrained.label(), "NOT TRAINED");
        assert_eq!(ModelStatus::Trained.label(), "TRAINED");
        assert_eq!(
            ModelStatus::from("needs_more_data".to_string()).label(),
            "NEEDS MORE DATA"
        );
        assert_eq!(
            ModelStatus::Error.indicator_class(),
            "status-indicator ms-2 status-error"
        );
        assert_eq!(status_element_id("esg_score"), "esg_scoreStatus");
    }

    #[test]
    fn test_status_rows() {
        let rows = status_rows(None);
        assert_eq!(rows.len(), ModelKind::ALL.len());
        assert!(rows.iter().all(|(_, s)| s.label() == "UNKNOWN"));

        let mut models = BTreeMap::new();
        models.insert("packaging".to_string(), ModelStatus::Trained);
        let snapshot = StatusSnapshot::new(models);
        let rows = status_rows(Some(&snapshot));
        assert_eq!(rows[0], (ModelKind::Packaging, ModelStatus::Trained));
        assert!(rows[1..].iter().all(|(_, s)| *s == ModelStatus::NotTrained));
    }

    #[tokio::test]
    async fn test_fetch_status() {
        let transport = ScriptedTransport::new().respond(
            STATUS_PATH,
            200,
            json!({
                "packaging": "trained",
                "carbon_footprint": "not_trained",
                "product_recommendation": "training",
                "esg_score": "error"
            }),
        );

        let snapshot = fetch_status(&transport).await.unwrap();
        assert_eq!(snapshot.get(ModelKind::Packaging), Some(&ModelStatus::Trained));
        assert_eq!(
            snapshot.get(ModelKind::CarbonFootprint),
            Some(&ModelStatus::NotTrained)
        );
        assert_eq!(snapshot.get(ModelKind::EsgScore), Some(&ModelStatus::Error));
        assert_eq!(snapshot.trained_count(), 1);
        assert_eq!(transport.calls.borrow()[0].method, "GET");
    }

    #[tokio::test]
    async fn test_fetch_status_failure() {
        let transport =
            ScriptedTransport::new().respond(STATUS_PATH, 500, json!({"error": "manager offline"}));
        let err = fetch_status(&transport).await.unwrap_err();
        assert_eq!(err.to_string(), "manager offline");

        // Nothing queued any more
        let err = fetch_status(&transport).await.unwrap_err();
        assert!(matches!(err, DispatchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_request_training() {
        let transport = ScriptedTransport::new()
            .respond(
                TRAIN_PATH,
                200,
                json!({"message": "Training initiated for all model(s)", "status": "training"}),
            )
            .respond(
                TRAIN_PATH,
                200,
                json!({"message": "Training initiated for esg_score model(s)", "status": "training"}),
            );

        let ack = request_training(&transport, None).await.unwrap();
        assert_eq!(ack.status, ModelStatus::Training);

        request_training(&transport, Some(ModelKind::EsgScore)).await.unwrap();

        let calls = transport.calls.borrow();
        assert_eq!(calls[0].body, Some(json!({"model_type": "all"})));
        assert_eq!(calls[1].body, Some(json!({"model_type": "esg_score"})));
    }
}
