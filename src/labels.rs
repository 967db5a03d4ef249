use std::fs;
use std::path::Path;

use crate::error::StartupError;

/// Fallback label for a predicted index outside the catalog. Guards against a
/// model/label-file mismatch without failing the request.
const UNKNOWN_LABEL: &str = "Unknown";

/// Ordered class list, loaded once at startup and immutable afterwards. Line
/// `i` of the label file names output `i` of the classifier.
#[derive(Debug)]
pub struct LabelCatalog {
    labels: Vec<String>,
}

impl LabelCatalog {
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.exists() {
            return Err(StartupError::ResourceMissing(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path)?;
        let labels = raw.lines().map(|line| line.trim().to_string()).collect();

        Ok(Self { labels })
    }

    /// Label for a predicted class index, or `"Unknown"` when the index falls
    /// outside the catalog.
    pub fn resolve(&self, index: usize) -> &str {
        self.labels
            .get(index)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
