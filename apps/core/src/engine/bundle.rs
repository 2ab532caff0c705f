use serde::{Deserialize, Serialize};

use super::estimator::{Estimator, EstimatorSpec, LabelDecoder, LabelEncoder};
use super::features::ModelKind;

/// On-disk layout of a model artifact: `(estimator, label_encoder, feature_columns)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact(pub EstimatorSpec, pub LabelEncoder, pub Vec<String>);

impl ModelArtifact {
    /// Checks the estimator against its own feature columns and labels.
    pub fn validate(&self) -> Result<(), String> {
        let ModelArtifact(estimator, labels, columns) = self;
        if labels.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        estimator.validate(columns.len(), labels.classes.len())
    }

    pub fn into_bundle(self, name: impl Into<String>) -> ModelBundle {
        let ModelArtifact(estimator, labels, columns) = self;
        ModelBundle::new(name, Box::new(estimator), Box::new(labels), columns)
    }
}

/// A loaded model: estimator, label decoder and the feature order it expects.
///
/// Read-only once constructed, so it can be shared across submissions freely.
pub struct ModelBundle {
    name: String,
    estimator: Box<dyn Estimator>,
    labels: Box<dyn LabelDecoder>,
    feature_columns: Vec<String>,
}

impl ModelBundle {
    pub fn new(
        name: impl Into<String>,
        estimator: Box<dyn Estimator>,
        labels: Box<dyn LabelDecoder>,
        feature_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            estimator,
            labels,
            feature_columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn estimator(&self) -> &dyn Estimator {
        self.estimator.as_ref()
    }

    pub fn labels(&self) -> &dyn LabelDecoder {
        self.labels.as_ref()
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Naming convention of the expected columns.
    pub fn kind(&self) -> ModelKind {
        ModelKind::classify(&self.feature_columns)
    }
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("name", &self.name)
            .field("estimator", &self.estimator.describe())
            .field("classes", &self.labels.classes())
            .field("feature_columns", &self.feature_columns)
            .finish()
    }
}
