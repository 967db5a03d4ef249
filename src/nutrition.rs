use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::{NutritionOutcome, NutritionRecord};

const MISSING_KEYS: &str = "API keys missing";
const FETCH_FAILED: &str = "Failed to fetch nutrition";

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Client for the Edamam nutrition-data API. Lookups are best-effort: any
/// failure degrades the nutrition field of the response instead of failing
/// the prediction.
pub struct NutritionClient {
    http: reqwest::Client,
    base_url: String,
    app_id: Option<String>,
    app_key: Option<String>,
}

#[derive(Debug, Error)]
enum LookupError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("unreadable response: {0}")]
    Parse(String),
}

/// Subset of the Edamam response this service reports. Every field defaults
/// so a sparse provider payload still yields zeros rather than a parse error.
#[derive(Debug, Default, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    calories: f64,

    #[serde(default, rename = "totalNutrients")]
    total_nutrients: NutrientTable,
}

#[derive(Debug, Default, Deserialize)]
struct NutrientTable {
    #[serde(default, rename = "PROCNT")]
    protein: Nutrient,

    #[serde(default, rename = "FAT")]
    fat: Nutrient,

    #[serde(default, rename = "CHOCDF")]
    carbs: Nutrient,
}

#[derive(Debug, Default, Deserialize)]
struct Nutrient {
    #[serde(default)]
    quantity: f64,
}

impl NutritionClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.edamam_url.clone(),
            app_id: config.edamam_app_id.clone(),
            app_key: config.edamam_app_key.clone(),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.app_id.is_some() && self.app_key.is_some()
    }

    /// Fetch macro-nutrients for a food name. Without credentials no network
    /// call is attempted at all.
    pub async fn lookup(&self, food_name: &str) -> NutritionOutcome {
        let (app_id, app_key) = match (&self.app_id, &self.app_key) {
            (Some(id), Some(key)) => (id, key),
            _ => {
                log::warn!("missing Edamam credentials, skipping nutrition lookup");
                return NutritionOutcome::unavailable(MISSING_KEYS);
            }
        };

        match self.fetch(app_id, app_key, food_name).await {
            Ok(record) => NutritionOutcome::Facts(record),
            Err(e) => {
                log::warn!("nutrition lookup for '{}' failed: {}", food_name, e);
                NutritionOutcome::unavailable(FETCH_FAILED)
            }
        }
    }

    async fn fetch(
        &self,
        app_id: &str,
        app_key: &str,
        food_name: &str,
    ) -> Result<NutritionRecord, LookupError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("app_id", app_id), ("app_key", app_key), ("ingr", food_name)])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let data: ProviderResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(NutritionRecord {
            calories: data.calories,
            protein: data.total_nutrients.protein.quantity,
            fat: data.total_nutrients.fat.quantity,
            carbs: data.total_nutrients.carbs.quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config(app_id: Option<&str>, app_key: Option<&str>) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            model_path: PathBuf::from("model.onnx"),
            labels_path: PathBuf::from("labels.txt"),
            edamam_app_id: app_id.map(str::to_string),
            edamam_app_key: app_key.map(str::to_string),
            // unroutable on purpose: a lookup that reaches the network would
            // come back as FETCH_FAILED, not MISSING_KEYS
            edamam_url: "http://127.0.0.1:1/nutrition-data".to_string(),
        }
    }

    #[actix_rt::test]
    async fn missing_credentials_short_circuit() {
        let client = NutritionClient::new(&test_config(None, None));
        let outcome = client.lookup("ramen").await;
        assert_eq!(outcome, NutritionOutcome::unavailable("API keys missing"));
    }

    #[actix_rt::test]
    async fn one_missing_credential_is_still_missing() {
        let client = NutritionClient::new(&test_config(Some("id"), None));
        let outcome = client.lookup("ramen").await;
        assert_eq!(outcome, NutritionOutcome::unavailable("API keys missing"));
    }

    #[actix_rt::test]
    async fn unreachable_provider_degrades_softly() {
        let client = NutritionClient::new(&test_config(Some("id"), Some("key")));
        let outcome = client.lookup("ramen").await;
        assert_eq!(
            outcome,
            NutritionOutcome::unavailable("Failed to fetch nutrition")
        );
    }

    #[test]
    fn full_provider_payload_is_extracted() {
        let body = r#"{
            "calories": 250,
            "totalNutrients": {
                "PROCNT": {"quantity": 12.5},
                "FAT": {"quantity": 8.0},
                "CHOCDF": {"quantity": 30.0}
            }
        }"#;

        let data: ProviderResponse = serde_json::from_str(body).unwrap();
        assert_eq!(data.calories, 250.0);
        assert_eq!(data.total_nutrients.protein.quantity, 12.5);
        assert_eq!(data.total_nutrients.fat.quantity, 8.0);
        assert_eq!(data.total_nutrients.carbs.quantity, 30.0);
    }

    #[test]
    fn missing_nutrients_default_to_zero() {
        let data: ProviderResponse =
            serde_json::from_str(r#"{"calories": 95, "totalNutrients": {}}"#).unwrap();
        assert_eq!(data.calories, 95.0);
        assert_eq!(data.total_nutrients.protein.quantity, 0.0);
        assert_eq!(data.total_nutrients.fat.quantity, 0.0);
        assert_eq!(data.total_nutrients.carbs.quantity, 0.0);

        let empty: ProviderResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.calories, 0.0);
        assert_eq!(empty.total_nutrients.carbs.quantity, 0.0);
    }
}
