//! # Engine Module
//!
//! Model loading, feature alignment and prediction for the diet and gym plan
//! classifiers.
//!
//! ## Components
//! - `loader`: artifact codecs and the model loader
//! - `bundle`: loaded model handle (estimator, label decoder, feature order)
//! - `estimator`: inference and label decoding capabilities
//! - `features`: semantic input and aligned feature rows
//! - `rules`: per-model naming-convention tables
//! - `predictor`: align, infer and decode in one call

pub mod bundle;
pub mod estimator;
pub mod features;
pub mod loader;
pub mod predictor;
pub mod rules;

pub use bundle::{ModelArtifact, ModelBundle};
pub use estimator::{
    DecisionTree, Estimator, EstimatorSpec, LabelDecoder, LabelEncoder, LinearClassifier,
    RandomForest, TreeNode,
};
pub use features::{align, align_for, FeatureRow, ModelKind, SemanticInput};
pub use loader::{default_codecs, load_model, ArtifactCodec, BincodeCodec, JsonCodec, ModelLoader};
pub use predictor::{predict, Prediction, Predictor, StrictMode};
pub use rules::{RuleTable, DIET_RULES, GYM_RULES};
