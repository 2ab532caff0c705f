//! Feature naming-convention tables.
//!
//! Each model family was trained against its own column naming. A table maps a
//! target column (exact name or prefix) to a resolution rule that says how to
//! pull its value out of the semantic input. Rules are evaluated in order and
//! the first one whose pattern matches the column wins.

use serde::Serialize;

use super::features::SemanticInput;

/// Which part of a column name a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pattern {
    /// The whole column name.
    Exact(&'static str),
    /// Column names starting with this prefix (and carrying a non-empty suffix).
    Prefix(&'static str),
}

impl Pattern {
    /// Returns the suffix captured by the pattern, or `None` when it does not match.
    fn capture<'a>(&self, column: &'a str) -> Option<&'a str> {
        match self {
            Pattern::Exact(name) => (column == *name).then_some(""),
            Pattern::Prefix(prefix) => column
                .strip_prefix(prefix)
                .filter(|suffix| !suffix.is_empty()),
        }
    }
}

/// How a matched column gets its value.
///
/// Candidate keys are templates: `{column}` expands to the full target column
/// and `{suffix}` to the part captured by a prefix pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// Copy the value of the first candidate key present in the input.
    Synonym(&'static [&'static str]),
    /// 1 when any present candidate key carries a truthy flag, else 0.
    Flag(&'static [&'static str]),
    /// `1 - value` of the given key.
    Complement(&'static str),
}

/// One entry of a naming-convention table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Rule {
    pub pattern: Pattern,
    pub resolution: Resolution,
}

/// An ordered, versioned set of rules for one model family.
#[derive(Debug, Serialize)]
pub struct RuleTable {
    pub name: &'static str,
    pub version: u32,
    pub rules: &'static [Rule],
}

const fn flag_prefix(prefix: &'static str) -> Rule {
    Rule {
        pattern: Pattern::Prefix(prefix),
        resolution: Resolution::Flag(&["{column}"]),
    }
}

const fn synonym(column: &'static str, keys: &'static [&'static str]) -> Rule {
    Rule {
        pattern: Pattern::Exact(column),
        resolution: Resolution::Synonym(keys),
    }
}

const fn complement(column: &'static str, key: &'static str) -> Rule {
    Rule {
        pattern: Pattern::Exact(column),
        resolution: Resolution::Complement(key),
    }
}

/// Diet models are trained on one-hot columns named after the semantic keys.
pub static DIET_RULES: RuleTable = RuleTable {
    name: "diet",
    version: 1,
    rules: &[
        flag_prefix("Gender_"),
        flag_prefix("Disease_Type_"),
        flag_prefix("Severity_"),
        flag_prefix("Physical_Activity_Level_"),
        flag_prefix("Dietary_Restrictions_"),
        flag_prefix("Allergies_"),
        flag_prefix("Preferred_Cuisine_"),
    ],
};

/// Gym models use a different vocabulary for the same attributes.
pub static GYM_RULES: RuleTable = RuleTable {
    name: "gym",
    version: 1,
    rules: &[
        synonym("Height", &["Height_cm"]),
        synonym("Weight", &["Weight_kg"]),
        Rule {
            pattern: Pattern::Prefix("Sex_"),
            resolution: Resolution::Flag(&["Sex_{suffix}", "Gender_{suffix}"]),
        },
        synonym("Hypertension_Yes", &["Disease_Type_Hypertension"]),
        complement("Hypertension_No", "Disease_Type_Hypertension"),
        synonym("Diabetes_Yes", &["Disease_Type_Diabetes"]),
        complement("Diabetes_No", "Disease_Type_Diabetes"),
        synonym("Fitness Goal_Weight Loss", &["Fitness Goal_Lose Weight"]),
        synonym("Fitness Goal_Weight Gain", &["Fitness Goal_Gain Muscle"]),
    ],
};

fn expand(template: &str, column: &str, suffix: &str) -> String {
    template
        .replace("{column}", column)
        .replace("{suffix}", suffix)
}

impl RuleTable {
    /// Finds the first rule whose pattern matches `column`.
    pub fn rule_for<'c>(&self, column: &'c str) -> Option<(&Rule, &'c str)> {
        self.rules
            .iter()
            .find_map(|rule| rule.pattern.capture(column).map(|suffix| (rule, suffix)))
    }

    /// Resolves a column against the input.
    ///
    /// Returns `None` when no rule matches or the matching rule found none of its
    /// keys in the input; the caller leaves such columns at zero.
    pub fn resolve(&self, column: &str, input: &SemanticInput) -> Option<f64> {
        let (rule, suffix) = self.rule_for(column)?;

        match rule.resolution {
            Resolution::Synonym(keys) => keys
                .iter()
                .find_map(|key| input.get(&expand(key, column, suffix))),
            Resolution::Flag(keys) => {
                let present: Vec<f64> = keys
                    .iter()
                    .filter_map(|key| input.get(&expand(key, column, suffix)))
                    .collect();
                if present.is_empty() {
                    None
                } else if present.iter().any(|v| is_truthy(*v)) {
                    Some(1.0)
                } else {
                    Some(0.0)
                }
            }
            Resolution::Complement(key) => input.get(key).map(|v| 1.0 - v),
        }
    }
}

fn is_truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}
