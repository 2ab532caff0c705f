//! Loader Tests
//!
//! Codec order, fallback decoding and the two load failure kinds.

use std::fs;
use tempfile::tempdir;

use super::fixtures::{cols, diet_artifact, gym_artifact, labels, stump};
use crate::engine::{default_codecs, EstimatorSpec, JsonCodec, ModelArtifact, ModelLoader};
use crate::error::AppError;

#[test]
fn test_missing_file_is_not_found_with_path() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(dir.path());

    let err = loader.load("diet_model.pkl").unwrap_err();
    match &err {
        AppError::NotFound { path } => assert_eq!(path, &dir.path().join("diet_model.pkl")),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Model file not found at: "));
    assert!(err.to_string().ends_with("diet_model.pkl"));
}

#[test]
fn test_json_artifact_loads() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(dir.path());
    loader.save("diet_model.pkl", &diet_artifact(), "json").unwrap();

    let bundle = loader.load("diet_model.pkl").unwrap();
    assert_eq!(bundle.name(), "diet_model.pkl");
    assert_eq!(bundle.feature_columns(), diet_artifact().2.as_slice());
    assert_eq!(bundle.labels().classes(), &["Balanced", "Low_Carb"]);
}

#[test]
fn test_bincode_artifact_loads_through_fallback() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(dir.path());
    let path = loader.save("gym_model.pkl", &gym_artifact(), "bincode").unwrap();

    // Not JSON, so the first codec must fail and the file be rewound.
    assert!(serde_json::from_slice::<serde_json::Value>(&fs::read(&path).unwrap()).is_err());

    let bundle = loader.load("gym_model.pkl").unwrap();
    assert_eq!(bundle.estimator().describe(), "RandomForestClassifier (2 trees)");
    assert_eq!(bundle.labels().classes(), &["Cardio", "Strength"]);
}

#[test]
fn test_undecodable_file_reports_every_codec() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("diet_model.pkl"), b"not a model at all").unwrap();
    let loader = ModelLoader::new(dir.path());

    match loader.load("diet_model.pkl") {
        Err(AppError::Load { name, cause }) => {
            assert_eq!(name, "diet_model.pkl");
            assert!(cause.contains("json: "), "cause: {}", cause);
            assert!(cause.contains("bincode: "), "cause: {}", cause);
        }
        other => panic!("expected Load error, got {:?}", other),
    }
}

#[test]
fn test_oversized_length_prefix_is_load_error() {
    let dir = tempdir().unwrap();
    // Linear estimator with no rows, then one class whose name claims 64 TiB.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.extend_from_slice(&1u64.to_le_bytes());
    bytes.extend_from_slice(&(1u64 << 46).to_le_bytes());
    fs::write(dir.path().join("diet_model.pkl"), &bytes).unwrap();

    match ModelLoader::new(dir.path()).load("diet_model.pkl") {
        Err(AppError::Load { cause, .. }) => assert!(cause.contains("bincode: "), "{}", cause),
        other => panic!("expected Load error, got {:?}", other),
    }
}

#[test]
fn test_truncated_bincode_artifact_is_load_error() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(dir.path());
    let path = loader.save("gym_model.pkl", &gym_artifact(), "bincode").unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(matches!(
        loader.load("gym_model.pkl"),
        Err(AppError::Load { .. })
    ));
}

#[test]
fn test_structurally_invalid_artifact_is_rejected() {
    let dir = tempdir().unwrap();
    // Splits on feature 5 while only two columns exist.
    let artifact = ModelArtifact(
        EstimatorSpec::DecisionTree(stump(5, 0.5, 0, 1)),
        labels(&["A", "B"]),
        cols(&["Age", "BMI"]),
    );
    let json = serde_json::to_string(&artifact).unwrap();
    fs::write(dir.path().join("gym_model.pkl"), json).unwrap();

    let err = ModelLoader::new(dir.path()).load("gym_model.pkl").unwrap_err();
    assert_eq!(err.kind(), "load_error");
}

#[test]
fn test_empty_label_encoder_is_rejected() {
    let dir = tempdir().unwrap();
    let json = r#"[{"decision_tree":{"nodes":[{"leaf":{"class":0}}]}},{"classes":[]},["Age"]]"#;
    fs::write(dir.path().join("diet_model.pkl"), json).unwrap();

    match ModelLoader::new(dir.path()).load("diet_model.pkl") {
        Err(AppError::Load { cause, .. }) => assert!(cause.contains("no classes")),
        other => panic!("expected Load error, got {:?}", other),
    }
}

#[test]
fn test_codec_list_limits_what_loads() {
    let dir = tempdir().unwrap();
    ModelLoader::new(dir.path())
        .save("gym_model.pkl", &gym_artifact(), "bincode")
        .unwrap();

    let json_only = ModelLoader::with_codecs(dir.path(), vec![Box::new(JsonCodec)]);
    assert!(matches!(
        json_only.load("gym_model.pkl"),
        Err(AppError::Load { .. })
    ));
}

#[test]
fn test_default_codec_order() {
    let names: Vec<&str> = default_codecs().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["json", "bincode"]);
}

#[test]
fn test_save_rejects_unknown_codec() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(dir.path());
    assert!(matches!(
        loader.save("diet_model.pkl", &diet_artifact(), "pickle"),
        Err(AppError::Config(_))
    ));
    assert!(!dir.path().join("diet_model.pkl").exists());
}

#[test]
fn test_reload_gives_equal_bundles() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(dir.path());
    loader.save("diet_model.pkl", &diet_artifact(), "json").unwrap();

    let first = loader.load("diet_model.pkl").unwrap();
    let second = loader.load("diet_model.pkl").unwrap();
    assert_eq!(first.feature_columns(), second.feature_columns());
    assert_eq!(first.labels().classes(), second.labels().classes());
}
