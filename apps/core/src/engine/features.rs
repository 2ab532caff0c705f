//! Feature alignment.
//!
//! Turns a semantic input (human-meaningful attribute names) into a single row
//! whose columns are exactly the ones a model was trained on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::rules::{RuleTable, DIET_RULES, GYM_RULES};

/// Attribute name to numeric value, built once per form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticInput(BTreeMap<String, f64>);

impl SemanticInput {
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for SemanticInput {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Naming convention family of a model, detected from its expected columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Diet,
    Gym,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl ModelKind {
    /// Diet models carry `Weight_kg` or any `Dietary_Restrictions*` column;
    /// everything else uses the gym vocabulary.
    pub fn classify<S: AsRef<str>>(columns: &[S]) -> Self {
        let is_diet = columns.iter().any(|c| {
            let c = c.as_ref();
            c == "Weight_kg" || c.contains("Dietary_Restrictions")
        });
        if is_diet {
            ModelKind::Diet
        } else {
            ModelKind::Gym
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Diet => "diet",
            ModelKind::Gym => "gym",
        }
    }

    pub fn rules(&self) -> &'static RuleTable {
        match self {
            ModelKind::Diet => &DIET_RULES,
            ModelKind::Gym => &GYM_RULES,
        }
    }
}

/// A single row with exactly the expected columns, in the expected order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Vec<f64>,
    /// Expected columns that no input key resolved; they hold the zero default.
    unresolved: Vec<String>,
}

impl FeatureRow {
    fn zeroed(columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            values: vec![0.0; columns.len()],
            unresolved: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the first column with this name.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Replaces non-finite cells with zero. Returns how many were replaced.
    fn fill_missing(&mut self) -> usize {
        let mut filled = 0;
        for value in self.values.iter_mut().filter(|v| !v.is_finite()) {
            *value = 0.0;
            filled += 1;
        }
        filled
    }
}

/// Aligns `input` to `expected_columns`, picking the rule set from the columns.
pub fn align(input: &SemanticInput, expected_columns: &[String]) -> FeatureRow {
    align_for(ModelKind::classify(expected_columns), input, expected_columns)
}

/// Aligns `input` to `expected_columns` using the rule set of `kind`.
///
/// Columns present in the input by name are copied verbatim; the rest go
/// through the kind's rule table. Input keys no column asks for are dropped.
pub fn align_for(kind: ModelKind, input: &SemanticInput, expected_columns: &[String]) -> FeatureRow {
    let rules = kind.rules();
    let mut row = FeatureRow::zeroed(expected_columns);

    for (idx, column) in expected_columns.iter().enumerate() {
        if let Some(value) = input.get(column) {
            row.values[idx] = value;
            continue;
        }

        match rules.resolve(column, input) {
            Some(value) => row.values[idx] = value,
            None => row.unresolved.push(column.clone()),
        }
    }

    let filled = row.fill_missing();
    if filled > 0 {
        tracing::warn!("Input contains {} missing values. Filling with zeros.", filled);
    }

    row
}
