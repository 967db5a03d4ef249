use std::path::PathBuf;

use thiserror::Error;

/// Errors that prevent the server from starting at all.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("required file not found: {}", .0.display())]
    ResourceMissing(PathBuf),

    #[error("failed to read label file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load model: {0}")]
    ModelLoad(String),
}

/// Per-request failures. Each one is caught at the handler boundary and
/// rendered as an in-body `{"error": ...}` payload with HTTP 200.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("upload error: {0}")]
    Upload(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("inference failed: {0}")]
    Inference(String),
}
