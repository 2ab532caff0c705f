use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// A model artifact file does not exist at the resolved path.
    #[error("Model file not found at: {}", path.display())]
    NotFound { path: PathBuf },

    /// A model artifact exists but could not be decoded by any codec, or decoded
    /// into a structurally invalid model.
    #[error("Failed to load model '{name}': {cause}")]
    Load { name: String, cause: String },

    /// Inference or label decoding failed for an otherwise loaded model.
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Represents data validation errors (e.g., out-of-range form input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., bad environment values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Short machine-friendly name of the error kind, used in JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "not_found",
            AppError::Load { .. } => "load_error",
            AppError::Prediction(_) => "prediction_error",
            AppError::Validation(_) => "validation_error",
            AppError::Config(_) => "config_error",
            AppError::Io(_) => "io_error",
        }
    }

    /// Technical detail for the expandable section under a user-facing message.
    pub fn detail(&self) -> String {
        format!("{:?}", self)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}
