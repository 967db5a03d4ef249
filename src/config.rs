use std::env;
use std::path::PathBuf;

pub const DEFAULT_EDAMAM_URL: &str = "https://api.edamam.com/api/nutrition-data";

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// Path to the ONNX food classifier.
    pub model_path: PathBuf,

    /// Path to the class list, one label per line, ordered to match the
    /// model's output vector.
    pub labels_path: PathBuf,

    pub edamam_app_id: Option<String>,
    pub edamam_app_key: Option<String>,
    pub edamam_url: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for everything except the Edamam credentials.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "food_model_v3.onnx".to_string())
                .into(),

            labels_path: env::var("LABELS_PATH")
                .unwrap_or_else(|_| "labels_food101.txt".to_string())
                .into(),

            edamam_app_id: non_empty_var("EDAMAM_APP_ID"),
            edamam_app_key: non_empty_var("EDAMAM_APP_KEY"),

            edamam_url: env::var("EDAMAM_URL")
                .unwrap_or_else(|_| DEFAULT_EDAMAM_URL.to_string()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
