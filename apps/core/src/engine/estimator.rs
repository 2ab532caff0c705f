//! Estimators and label decoders.
//!
//! The traits are the seam between the predictor and a concrete model
//! technology. The serializable types below are the ones stored in model
//! artifacts: CART-style decision trees, majority-vote forests of them and
//! multi-class linear scorers.

use serde::{Deserialize, Serialize};

use super::features::FeatureRow;
use crate::error::AppError;

/// Inference entry point of a trained classifier.
pub trait Estimator: Send + Sync {
    /// Returns the class index predicted for a single aligned row.
    fn infer(&self, row: &FeatureRow) -> Result<usize, AppError>;

    /// Short human-readable description (kind and size).
    fn describe(&self) -> String;
}

/// Turns a class index back into the label the model was trained on.
pub trait LabelDecoder: Send + Sync {
    fn decode(&self, class_index: usize) -> Result<String, AppError>;

    fn classes(&self) -> &[String];
}

/// Ordered class labels; index `i` decodes to `classes[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelDecoder for LabelEncoder {
    fn decode(&self, class_index: usize) -> Result<String, AppError> {
        self.classes.get(class_index).cloned().ok_or_else(|| {
            AppError::Prediction(format!(
                "y contains previously unseen labels: [{}] (encoder knows {} classes)",
                class_index,
                self.classes.len()
            ))
        })
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// `row[feature] <= threshold` goes to `left`, everything else to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

/// Flat array of nodes; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn predict(&self, row: &FeatureRow) -> Result<usize, AppError> {
        let values = row.values();
        let mut idx = 0;

        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { class }) => return Ok(*class),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = values.get(*feature).ok_or_else(|| {
                        AppError::Prediction(format!(
                            "X has {} features, but the tree splits on feature {}",
                            values.len(),
                            feature
                        ))
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(AppError::Prediction(format!(
                        "tree node {} does not exist",
                        idx
                    )))
                }
            }
        }

        Err(AppError::Prediction("tree traversal did not reach a leaf".to_string()))
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("decision tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but only {} feature columns exist",
                            i, feature, n_features
                        ));
                    }
                    // Children always come after their parent, which rules out cycles.
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                TreeNode::Leaf { class } => {
                    if *class >= n_classes {
                        return Err(format!(
                            "leaf {} predicts class {} but only {} labels exist",
                            i, class, n_classes
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Trees vote; ties go to the lowest class index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn predict(&self, row: &FeatureRow) -> Result<usize, AppError> {
        let mut votes: Vec<usize> = Vec::new();
        for tree in &self.trees {
            let class = tree.predict(row)?;
            if class >= votes.len() {
                votes.resize(class + 1, 0);
            }
            votes[class] += 1;
        }

        let mut best: Option<(usize, usize)> = None;
        for (class, count) in votes.into_iter().enumerate() {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class)
            .ok_or_else(|| AppError::Prediction("random forest has no trees".to_string()))
    }
}

/// One coefficient row and intercept per class; the highest score wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    fn predict(&self, row: &FeatureRow) -> Result<usize, AppError> {
        let values = row.values();
        let mut best: Option<(usize, f64)> = None;

        for (class, (weights, intercept)) in
            self.coefficients.iter().zip(&self.intercepts).enumerate()
        {
            if weights.len() != values.len() {
                return Err(AppError::Prediction(format!(
                    "X has {} features, but the classifier is expecting {} features as input",
                    values.len(),
                    weights.len()
                )));
            }
            let score: f64 = intercept + weights.iter().zip(values).map(|(w, x)| w * x).sum::<f64>();
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((class, score));
            }
        }

        best.map(|(class, _)| class)
            .ok_or_else(|| AppError::Prediction("linear classifier has no classes".to_string()))
    }
}

/// Serializable estimator stored in model artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorSpec {
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    Linear(LinearClassifier),
}

impl EstimatorSpec {
    /// Structural checks against the artifact's feature columns and labels.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        match self {
            EstimatorSpec::DecisionTree(tree) => tree.validate(n_features, n_classes),
            EstimatorSpec::RandomForest(forest) => {
                if forest.trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                forest
                    .trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, tree)| {
                        tree.validate(n_features, n_classes)
                            .map_err(|e| format!("tree {}: {}", i, e))
                    })
            }
            EstimatorSpec::Linear(linear) => {
                if linear.coefficients.len() != linear.intercepts.len() {
                    return Err(format!(
                        "{} coefficient rows but {} intercepts",
                        linear.coefficients.len(),
                        linear.intercepts.len()
                    ));
                }
                if linear.coefficients.len() != n_classes {
                    return Err(format!(
                        "{} coefficient rows but {} labels",
                        linear.coefficients.len(),
                        n_classes
                    ));
                }
                match linear.coefficients.iter().position(|w| w.len() != n_features) {
                    Some(row) => Err(format!(
                        "coefficient row {} has {} weights, expected {}",
                        row,
                        linear.coefficients[row].len(),
                        n_features
                    )),
                    None => Ok(()),
                }
            }
        }
    }
}

impl Estimator for EstimatorSpec {
    fn infer(&self, row: &FeatureRow) -> Result<usize, AppError> {
        match self {
            EstimatorSpec::DecisionTree(tree) => tree.predict(row),
            EstimatorSpec::RandomForest(forest) => forest.predict(row),
            EstimatorSpec::Linear(linear) => linear.predict(row),
        }
    }

    fn describe(&self) -> String {
        match self {
            EstimatorSpec::DecisionTree(tree) => {
                format!("DecisionTreeClassifier ({} nodes)", tree.nodes.len())
            }
            EstimatorSpec::RandomForest(forest) => {
                format!("RandomForestClassifier ({} trees)", forest.trees.len())
            }
            EstimatorSpec::Linear(linear) => {
                format!("LinearClassifier ({} classes)", linear.coefficients.len())
            }
        }
    }
}
