//! Prediction Results
//!
//! Response bodies of the four prediction endpoints. Optional numbers default
//! to zero so a partial response still renders.

use serde::{Deserialize, Serialize};

use crate::error::DispatchResult;
use crate::forms::FormId;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PackagingPrediction {
    pub prediction: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CarbonPrediction {
    /// Tons of CO2 per year
    pub prediction: f64,
    #[serde(default)]
    pub breakdown: Option<CarbonBreakdown>,
}

/// Carbon footprint split by category, tons CO2/year
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct CarbonBreakdown {
    #[serde(default)]
    pub transport: f64,
    #[serde(default)]
    pub housing: f64,
    #[serde(default)]
    pub food: f64,
    #[serde(default)]
    pub consumption: f64,
    #[serde(default)]
    pub other: f64,
}

impl CarbonBreakdown {
    pub const LABELS: [&'static str; 5] = ["Transport", "Housing", "Food", "Consumption", "Other"];

    /// Values in [`Self::LABELS`] order
    pub fn values(&self) -> [f64; 5] {
        [self.transport, self.housing, self.food, self.consumption, self.other]
    }

    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProductRecommendations {
    #[serde(default)]
    pub recommendations: Vec<ProductRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProductRecommendation {
    pub product_id: u64,
    pub category: String,
    #[serde(default)]
    pub eco_friendly: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub recommendation_score: f64,
    #[serde(default)]
    pub sustainability_score: f64,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EsgPrediction {
    pub esg_scores: EsgScores,
}

/// Scores on a 0-10 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct EsgScores {
    #[serde(default)]
    pub e_score: f64,
    #[serde(default)]
    pub s_score: f64,
    #[serde(default)]
    pub g_score: f64,
    #[serde(default)]
    pub overall_esg: f64,
}

/// A decoded prediction, tagged by the form that asked for it.
/// Serializes as the bare response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Packaging(PackagingPrediction),
    Carbon(CarbonPrediction),
    Products(ProductRecommendations),
    Esg(EsgPrediction),
}

impl PredictionResult {
    /// Decode a success body for `form`
    pub fn decode(form: FormId, body: serde_json::Value) -> DispatchResult<Self> {
        let result = match form {
            FormId::Packaging => Self::Packaging(serde_json::from_value(body)?),
            FormId::Carbon => Self::Carbon(serde_json::from_value(body)?),
            FormId::Product => Self::Products(serde_json::from_value(body)?),
            FormId::Esg => Self::Esg(serde_json::from_value(body)?),
        };
        Ok(result)
    }

    pub fn form(&self) -> FormId {
        match self {
            Self::Packaging(_) => FormId::Packaging,
            Self::Carbon(_) => FormId::Carbon,
            Self::Products(_) => FormId::Product,
            Self::Esg(_) => FormId::Esg,
        }
    }
}

/// Error body returned by the API on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
