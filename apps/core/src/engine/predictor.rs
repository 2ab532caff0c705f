use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::bundle::ModelBundle;
use super::features::{align_for, FeatureRow, ModelKind, SemanticInput};
use crate::error::AppError;

/// What to do when expected columns are left at their zero default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictMode {
    /// Silently keep the zero default.
    #[default]
    Off,
    /// Log the unresolved columns and predict anyway.
    Warn,
    /// Refuse to predict.
    Fail,
}

impl fmt::Display for StrictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrictMode::Off => "off",
            StrictMode::Warn => "warn",
            StrictMode::Fail => "fail",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for StrictMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "" => Ok(StrictMode::Off),
            "warn" => Ok(StrictMode::Warn),
            "fail" => Ok(StrictMode::Fail),
            other => Err(AppError::Config(format!(
                "Invalid strict feature mode '{}': expected off, warn or fail",
                other
            ))),
        }
    }
}

/// Outcome of one successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub class_index: usize,
    pub kind: ModelKind,
    pub unresolved_columns: Vec<String>,
}

/// Aligns semantic input to a bundle, runs inference and decodes the label.
#[derive(Debug, Clone, Copy, Default)]
pub struct Predictor {
    strict: StrictMode,
}

impl Predictor {
    pub fn new(strict: StrictMode) -> Self {
        Self { strict }
    }

    pub fn strict(&self) -> StrictMode {
        self.strict
    }

    pub fn predict(&self, bundle: &ModelBundle, input: &SemanticInput) -> Result<Prediction, AppError> {
        let columns = bundle.feature_columns();
        debug!("Input data keys: {:?}", input.keys().collect::<Vec<_>>());
        debug!("Expected feature columns: {:?}", columns);

        let kind = bundle.kind();
        info!("Using {} model mapping for '{}'", kind, bundle.name());

        let row = align_for(kind, input, columns);
        self.check_unresolved(bundle, &row)?;

        let class_index = bundle
            .estimator()
            .infer(&row)
            .map_err(|e| wrap_prediction_error(bundle, e))?;
        let label = bundle
            .labels()
            .decode(class_index)
            .map_err(|e| wrap_prediction_error(bundle, e))?;

        debug!("Model '{}' predicted class {} ({})", bundle.name(), class_index, label);

        Ok(Prediction {
            label,
            class_index,
            kind,
            unresolved_columns: row.unresolved().to_vec(),
        })
    }

    fn check_unresolved(&self, bundle: &ModelBundle, row: &FeatureRow) -> Result<(), AppError> {
        if row.unresolved().is_empty() {
            return Ok(());
        }
        match self.strict {
            StrictMode::Off => Ok(()),
            StrictMode::Warn => {
                warn!(
                    "Model '{}': {} expected columns left at default: {:?}",
                    bundle.name(),
                    row.unresolved().len(),
                    row.unresolved()
                );
                Ok(())
            }
            StrictMode::Fail => Err(AppError::Prediction(format!(
                "expected columns not provided by the input: {}",
                row.unresolved().join(", ")
            ))),
        }
    }
}

fn wrap_prediction_error(bundle: &ModelBundle, err: AppError) -> AppError {
    match err {
        AppError::Prediction(msg) => AppError::Prediction(msg),
        other => AppError::Prediction(format!("{} ({})", other, bundle.name())),
    }
}

/// Predicts a label without strict feature checks.
pub fn predict(bundle: &ModelBundle, input: &SemanticInput) -> Result<String, AppError> {
    Predictor::default().predict(bundle, input).map(|p| p.label)
}
