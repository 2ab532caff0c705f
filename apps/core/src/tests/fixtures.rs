//! Shared builders for hand-made model artifacts.

use crate::engine::{
    DecisionTree, EstimatorSpec, LabelEncoder, ModelArtifact, ModelBundle, RandomForest, TreeNode,
};
use crate::form::RequestContext;
use crate::models::UserProfile;

pub const DIET_COLUMNS: &[&str] = &[
    "Age",
    "Gender_Female",
    "Gender_Male",
    "Weight_kg",
    "Height_cm",
    "BMI",
    "Disease_Type_Diabetes",
    "Disease_Type_Hypertension",
    "Severity_Mild",
    "Physical_Activity_Level_Sedentary",
    "Dietary_Restrictions_Low_Sugar",
    "Allergies_Gluten",
    "Preferred_Cuisine_Italian",
];

pub const GYM_COLUMNS: &[&str] = &[
    "Sex_Male",
    "Sex_Female",
    "Age",
    "Height",
    "Weight",
    "Hypertension_No",
    "Hypertension_Yes",
    "Diabetes_No",
    "Diabetes_Yes",
    "BMI",
    "Fitness Goal_Weight Gain",
    "Fitness Goal_Weight Loss",
];

pub fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn labels(classes: &[&str]) -> LabelEncoder {
    LabelEncoder {
        classes: cols(classes),
    }
}

/// One split on `feature`: `<= threshold` predicts `low`, otherwise `high`.
pub fn stump(feature: usize, threshold: f64, low: usize, high: usize) -> DecisionTree {
    DecisionTree {
        nodes: vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { class: low },
            TreeNode::Leaf { class: high },
        ],
    }
}

/// Diet artifact: "Low_Carb" for diabetics, "Balanced" otherwise.
pub fn diet_artifact() -> ModelArtifact {
    let diabetes = DIET_COLUMNS
        .iter()
        .position(|c| *c == "Disease_Type_Diabetes")
        .unwrap();
    ModelArtifact(
        EstimatorSpec::DecisionTree(stump(diabetes, 0.5, 0, 1)),
        labels(&["Balanced", "Low_Carb"]),
        cols(DIET_COLUMNS),
    )
}

/// Gym artifact: strength work for muscle gain, cardio otherwise.
pub fn gym_artifact() -> ModelArtifact {
    let gain = GYM_COLUMNS
        .iter()
        .position(|c| *c == "Fitness Goal_Weight Gain")
        .unwrap();
    ModelArtifact(
        EstimatorSpec::RandomForest(RandomForest {
            trees: vec![stump(gain, 0.5, 0, 1), stump(gain, 0.5, 0, 1)],
        }),
        labels(&["Cardio", "Strength"]),
        cols(GYM_COLUMNS),
    )
}

pub fn diet_bundle() -> ModelBundle {
    diet_artifact().into_bundle("diet_model.pkl")
}

pub fn gym_bundle() -> ModelBundle {
    gym_artifact().into_bundle("gym_model.pkl")
}

pub fn context(profile: UserProfile) -> RequestContext {
    RequestContext::new(profile).expect("profile should be valid")
}
