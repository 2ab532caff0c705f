//! Predictor Tests
//!
//! Align, infer and decode through a bundle, under each strict feature mode.

use super::fixtures::{cols, context, diet_bundle, gym_bundle, labels, stump};
use crate::engine::{
    predict, EstimatorSpec, LinearClassifier, ModelArtifact, ModelBundle, ModelKind, Predictor,
    SemanticInput, StrictMode,
};
use crate::error::AppError;
use crate::models::{Condition, FitnessGoal, UserProfile};

fn partial_bundle() -> ModelBundle {
    // "Resting_HR" is not something the form produces.
    ModelArtifact(
        EstimatorSpec::DecisionTree(stump(0, 0.5, 0, 1)),
        labels(&["Low", "High"]),
        cols(&["Diabetes_Yes", "Resting_HR"]),
    )
    .into_bundle("gym_model.pkl")
}

#[test]
fn test_diet_prediction_uses_condition_flag() {
    let predictor = Predictor::default();
    let healthy = context(UserProfile::default());
    let diabetic = context(UserProfile {
        conditions: vec![Condition::Diabetes],
        ..UserProfile::default()
    });

    let bundle = diet_bundle();
    assert_eq!(predictor.predict(&bundle, &healthy.input).unwrap().label, "Balanced");

    let prediction = predictor.predict(&bundle, &diabetic.input).unwrap();
    assert_eq!(prediction.label, "Low_Carb");
    assert_eq!(prediction.class_index, 1);
    assert_eq!(prediction.kind, ModelKind::Diet);
    assert!(prediction.unresolved_columns.is_empty());
}

#[test]
fn test_gym_prediction_follows_goal() {
    let ctx = context(UserProfile {
        fitness_goal: FitnessGoal::GainMuscle,
        ..UserProfile::default()
    });
    let prediction = Predictor::default().predict(&gym_bundle(), &ctx.input).unwrap();
    assert_eq!(prediction.label, "Strength");
    assert_eq!(prediction.kind, ModelKind::Gym);
}

#[test]
fn test_free_predict_returns_label() {
    let ctx = context(UserProfile::default());
    assert_eq!(predict(&gym_bundle(), &ctx.input).unwrap(), "Cardio");
}

// ============================================================================
// Strict Feature Modes
// ============================================================================

#[test]
fn test_off_mode_predicts_with_unresolved_columns() {
    let ctx = context(UserProfile::default());
    let prediction = Predictor::new(StrictMode::Off)
        .predict(&partial_bundle(), &ctx.input)
        .unwrap();
    assert_eq!(prediction.label, "Low");
    assert_eq!(prediction.unresolved_columns, vec!["Resting_HR".to_string()]);
}

#[test]
fn test_warn_mode_still_predicts() {
    let ctx = context(UserProfile::default());
    let prediction = Predictor::new(StrictMode::Warn)
        .predict(&partial_bundle(), &ctx.input)
        .unwrap();
    assert_eq!(prediction.unresolved_columns, vec!["Resting_HR".to_string()]);
}

#[test]
fn test_fail_mode_refuses_unresolved_columns() {
    let ctx = context(UserProfile::default());
    match Predictor::new(StrictMode::Fail).predict(&partial_bundle(), &ctx.input) {
        Err(AppError::Prediction(msg)) => assert!(msg.contains("Resting_HR"), "{}", msg),
        other => panic!("expected prediction error, got {:?}", other),
    }
}

#[test]
fn test_fail_mode_accepts_fully_resolved_rows() {
    let ctx = context(UserProfile::default());
    let predictor = Predictor::new(StrictMode::Fail);
    assert!(predictor.predict(&diet_bundle(), &ctx.input).is_ok());
    assert!(predictor.predict(&gym_bundle(), &ctx.input).is_ok());
}

#[test]
fn test_strict_mode_parsing() {
    assert_eq!("WARN".parse::<StrictMode>().unwrap(), StrictMode::Warn);
    assert_eq!(" fail ".parse::<StrictMode>().unwrap(), StrictMode::Fail);
    assert_eq!("off".parse::<StrictMode>().unwrap(), StrictMode::Off);
    assert!(matches!(
        "always".parse::<StrictMode>(),
        Err(AppError::Config(_))
    ));
}

// ============================================================================
// Decoding Failures
// ============================================================================

#[test]
fn test_unknown_class_index_is_prediction_error() {
    // Built directly, so the artifact validation does not catch the bad leaf.
    let bundle = ModelBundle::new(
        "diet_model.pkl",
        Box::new(EstimatorSpec::DecisionTree(stump(0, 0.5, 3, 3))),
        Box::new(labels(&["Balanced"])),
        cols(&["Age"]),
    );
    let input = SemanticInput::from_pairs([("Age", 30.0)]);

    let err = Predictor::default().predict(&bundle, &input).unwrap_err();
    assert_eq!(err.kind(), "prediction_error");
    assert!(err.to_string().contains("previously unseen labels"));
}

#[test]
fn test_linear_shape_mismatch_is_prediction_error() {
    let bundle = ModelBundle::new(
        "diet_model.pkl",
        Box::new(EstimatorSpec::Linear(LinearClassifier {
            coefficients: vec![vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0]],
            intercepts: vec![0.0, 0.0],
        })),
        Box::new(labels(&["A", "B"])),
        cols(&["Age", "BMI"]),
    );
    let input = SemanticInput::from_pairs([("Age", 30.0), ("BMI", 22.0)]);

    assert!(matches!(
        Predictor::default().predict(&bundle, &input),
        Err(AppError::Prediction(_))
    ));
}
