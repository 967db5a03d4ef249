use serde::{Deserialize, Serialize};

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

/// In-body error payload. Returned with HTTP 200; callers inspect the body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Successful `POST /predict` body. `confidence` is a percentage rounded to
/// two decimal places.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_food: String,
    pub confidence: f32,
    pub nutrition: NutritionOutcome,
}

/// Macro-nutrients for one food item, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Nutrition lookup outcome. A failed lookup degrades only this field of the
/// response, so it serializes inline as either the record or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NutritionOutcome {
    Facts(NutritionRecord),
    Unavailable { error: String },
}

impl NutritionOutcome {
    pub fn unavailable(message: &str) -> Self {
        Self::Unavailable {
            error: message.to_string(),
        }
    }
}
