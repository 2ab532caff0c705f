use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::AppError;

/// A closed set of options offered by one form field.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    /// Every option, in the order the form lists them.
    const ALL: &'static [Self];

    /// Label shown in the form and used in feature names.
    fn label(&self) -> &'static str;

    /// Whether this is the "None" option of a multi-select.
    fn is_none(&self) -> bool {
        false
    }

    /// Parses a label, case-insensitively, accepting `-`, `_` or space as separators.
    fn parse_label(s: &str) -> Result<Self, AppError> {
        let wanted = normalize(s);
        Self::ALL
            .iter()
            .copied()
            .find(|c| normalize(c.label()) == wanted)
            .ok_or_else(|| {
                let options: Vec<&str> = Self::ALL.iter().map(|c| c.label()).collect();
                AppError::Validation(format!(
                    "'{}' is not one of: {}",
                    s.trim(),
                    options.join(", ")
                ))
            })
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Multi-select rule: an option counts only if it is picked and "None" is not.
pub fn is_selected<T: Choice>(items: &[T], item: T) -> bool {
    items.contains(&item) && !items.iter().any(Choice::is_none)
}

/// Picked options other than "None", or nothing when "None" is picked.
pub fn selected_labels<T: Choice>(items: &[T]) -> Vec<&'static str> {
    if items.iter().any(Choice::is_none) {
        return Vec::new();
    }
    items.iter().map(|c| c.label()).collect()
}

macro_rules! impl_display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Gender {
    Male,
    Female,
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum FitnessGoal {
    #[value(alias = "lose")]
    LoseWeight,
    #[value(alias = "gain")]
    GainMuscle,
    #[value(alias = "maintain")]
    MaintainFitness,
}

impl Choice for FitnessGoal {
    const ALL: &'static [Self] = &[
        FitnessGoal::LoseWeight,
        FitnessGoal::GainMuscle,
        FitnessGoal::MaintainFitness,
    ];

    fn label(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "Lose Weight",
            FitnessGoal::GainMuscle => "Gain Muscle",
            FitnessGoal::MaintainFitness => "Maintain Fitness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Condition {
    None,
    Diabetes,
    Hypertension,
    Obesity,
}

impl Choice for Condition {
    const ALL: &'static [Self] = &[
        Condition::None,
        Condition::Diabetes,
        Condition::Hypertension,
        Condition::Obesity,
    ];

    fn label(&self) -> &'static str {
        match self {
            Condition::None => "None",
            Condition::Diabetes => "Diabetes",
            Condition::Hypertension => "Hypertension",
            Condition::Obesity => "Obesity",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Condition::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl Choice for Severity {
    const ALL: &'static [Self] = &[
        Severity::None,
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
    ];

    fn label(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Severity::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ActivityLevel {
    Sedentary,
    Moderate,
    Active,
}

impl Choice for ActivityLevel {
    const ALL: &'static [Self] = &[
        ActivityLevel::Sedentary,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
    ];

    fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::Active => "Active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum DietaryRestriction {
    None,
    LowSodium,
    LowSugar,
}

impl Choice for DietaryRestriction {
    const ALL: &'static [Self] = &[
        DietaryRestriction::None,
        DietaryRestriction::LowSodium,
        DietaryRestriction::LowSugar,
    ];

    fn label(&self) -> &'static str {
        match self {
            DietaryRestriction::None => "None",
            DietaryRestriction::LowSodium => "Low_Sodium",
            DietaryRestriction::LowSugar => "Low_Sugar",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, DietaryRestriction::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Allergy {
    None,
    Gluten,
    Peanuts,
}

impl Choice for Allergy {
    const ALL: &'static [Self] = &[Allergy::None, Allergy::Gluten, Allergy::Peanuts];

    fn label(&self) -> &'static str {
        match self {
            Allergy::None => "None",
            Allergy::Gluten => "Gluten",
            Allergy::Peanuts => "Peanuts",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Allergy::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Cuisine {
    None,
    Chinese,
    Indian,
    Italian,
    Mexican,
}

impl Choice for Cuisine {
    const ALL: &'static [Self] = &[
        Cuisine::None,
        Cuisine::Chinese,
        Cuisine::Indian,
        Cuisine::Italian,
        Cuisine::Mexican,
    ];

    fn label(&self) -> &'static str {
        match self {
            Cuisine::None => "None",
            Cuisine::Chinese => "Chinese",
            Cuisine::Indian => "Indian",
            Cuisine::Italian => "Italian",
            Cuisine::Mexican => "Mexican",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Cuisine::None)
    }
}

impl_display_via_label!(
    Gender,
    FitnessGoal,
    Condition,
    Severity,
    ActivityLevel,
    DietaryRestriction,
    Allergy,
    Cuisine
);

/// Everything the user fills in on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    /// Age in years.
    #[validate(range(min = 10, max = 100))]
    pub age: u32,
    /// Body weight in kilograms.
    #[validate(range(min = 30.0, max = 200.0))]
    pub weight_kg: f64,
    pub gender: Gender,
    /// Height in centimetres.
    #[validate(range(min = 100.0, max = 250.0))]
    pub height_cm: f64,
    pub fitness_goal: FitnessGoal,
    pub conditions: Vec<Condition>,
    pub severity: Severity,
    pub activity_level: ActivityLevel,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    pub allergies: Vec<Allergy>,
    pub preferred_cuisine: Vec<Cuisine>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 25,
            weight_kg: 70.0,
            gender: Gender::Male,
            height_cm: 170.0,
            fitness_goal: FitnessGoal::LoseWeight,
            conditions: vec![Condition::None],
            severity: Severity::None,
            activity_level: ActivityLevel::Moderate,
            dietary_restrictions: vec![DietaryRestriction::None],
            allergies: vec![Allergy::None],
            preferred_cuisine: vec![Cuisine::None],
        }
    }
}

impl UserProfile {
    /// Range-checks the numeric fields.
    pub fn check(&self) -> Result<(), AppError> {
        if !self.weight_kg.is_finite() || !self.height_cm.is_finite() {
            return Err(AppError::Validation(
                "weight and height must be numbers".to_string(),
            ));
        }
        self.validate()?;
        Ok(())
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        is_selected(&self.conditions, condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(UserProfile::default().check().is_ok());
    }

    #[test]
    fn test_out_of_range_age_is_rejected() {
        let profile = UserProfile {
            age: 9,
            ..UserProfile::default()
        };
        assert!(matches!(profile.check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_out_of_range_height_is_rejected() {
        let profile = UserProfile {
            height_cm: 251.0,
            ..UserProfile::default()
        };
        assert!(profile.check().is_err());
    }

    #[test]
    fn test_nan_weight_is_rejected() {
        let profile = UserProfile {
            weight_kg: f64::NAN,
            ..UserProfile::default()
        };
        assert!(profile.check().is_err());
    }

    #[test]
    fn test_none_overrides_other_selections() {
        let picks = [Condition::Diabetes, Condition::None];
        assert!(!is_selected(&picks, Condition::Diabetes));
        assert!(selected_labels(&picks).is_empty());

        let picks = [Condition::Diabetes, Condition::Obesity];
        assert!(is_selected(&picks, Condition::Obesity));
        assert!(!is_selected(&picks, Condition::Hypertension));
    }

    #[test]
    fn test_parse_label_is_lenient() {
        assert_eq!(
            DietaryRestriction::parse_label("low-sodium").unwrap(),
            DietaryRestriction::LowSodium
        );
        assert_eq!(
            FitnessGoal::parse_label(" Gain Muscle ").unwrap(),
            FitnessGoal::GainMuscle
        );
        assert!(Cuisine::parse_label("French").is_err());
    }
}
