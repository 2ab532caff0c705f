//! Form submission processing.
//!
//! Turns a validated [`UserProfile`] into the semantic input dictionary the
//! models are aligned against. A fresh [`RequestContext`] is built for every
//! submission; nothing from a previous submission leaks into the next one.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::SemanticInput;
use crate::error::AppError;
use crate::models::{
    is_selected, selected_labels, ActivityLevel, Allergy, Condition, Cuisine, DietaryRestriction,
    FitnessGoal, Gender, Severity, UserProfile,
};

/// Body-mass index rounded to two decimals.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round2(weight_kg / (height_m * height_m))
}

/// Rounds to two decimals from the exact binary value, ties to even, so
/// `7.625` becomes `7.62` and `7.675` (stored just below) becomes `7.67`.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

fn flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Builds the semantic input for one submission.
///
/// Keys follow both naming conventions the models were trained with, so each
/// model can find its columns either directly or through its rule table.
pub fn build_semantic_input(profile: &UserProfile, bmi: f64) -> SemanticInput {
    let male = flag(profile.gender == Gender::Male);
    let female = flag(profile.gender == Gender::Female);

    let diabetes = flag(profile.has_condition(Condition::Diabetes));
    let hypertension = flag(profile.has_condition(Condition::Hypertension));
    let obesity = flag(profile.has_condition(Condition::Obesity));

    let severity = |s: Severity| flag(profile.severity == s);
    let activity = |a: ActivityLevel| flag(profile.activity_level == a);
    let restriction = |r: DietaryRestriction| flag(is_selected(&profile.dietary_restrictions, r));
    let allergy = |a: Allergy| flag(is_selected(&profile.allergies, a));
    let cuisine = |c: Cuisine| flag(is_selected(&profile.preferred_cuisine, c));
    let goal = |g: FitnessGoal| flag(profile.fitness_goal == g);

    let age = f64::from(profile.age);
    let weight = profile.weight_kg;
    let height = profile.height_cm;

    SemanticInput::from_pairs([
        // Basic info
        ("Age", age),
        ("Gender_Male", male),
        ("Gender_Female", female),
        ("Weight_kg", weight),
        ("Height_cm", height),
        ("BMI", bmi),
        // Gym vocabulary
        ("Weight", weight),
        ("Height", height),
        ("Sex_Male", male),
        ("Sex_Female", female),
        // Health conditions
        ("Disease_Type_Diabetes", diabetes),
        ("Disease_Type_Hypertension", hypertension),
        ("Disease_Type_Obesity", obesity),
        ("Diabetes_Yes", diabetes),
        ("Hypertension_Yes", hypertension),
        // Condition severity
        ("Severity_Mild", severity(Severity::Mild)),
        ("Severity_Moderate", severity(Severity::Moderate)),
        ("Severity_Severe", severity(Severity::Severe)),
        // Activity level
        ("Physical_Activity_Level_Active", activity(ActivityLevel::Active)),
        ("Physical_Activity_Level_Moderate", activity(ActivityLevel::Moderate)),
        ("Physical_Activity_Level_Sedentary", activity(ActivityLevel::Sedentary)),
        // Dietary preferences
        (
            "Dietary_Restrictions_Low_Sodium",
            restriction(DietaryRestriction::LowSodium),
        ),
        (
            "Dietary_Restrictions_Low_Sugar",
            restriction(DietaryRestriction::LowSugar),
        ),
        ("Allergies_Gluten", allergy(Allergy::Gluten)),
        ("Allergies_Peanuts", allergy(Allergy::Peanuts)),
        // Cuisine preferences
        ("Preferred_Cuisine_Chinese", cuisine(Cuisine::Chinese)),
        ("Preferred_Cuisine_Indian", cuisine(Cuisine::Indian)),
        ("Preferred_Cuisine_Italian", cuisine(Cuisine::Italian)),
        ("Preferred_Cuisine_Mexican", cuisine(Cuisine::Mexican)),
        // Fitness goals, both spellings
        ("Fitness Goal_Lose Weight", goal(FitnessGoal::LoseWeight)),
        ("Fitness Goal_Gain Muscle", goal(FitnessGoal::GainMuscle)),
        ("Fitness Goal_Maintain Fitness", goal(FitnessGoal::MaintainFitness)),
        ("Fitness Goal_Weight Loss", goal(FitnessGoal::LoseWeight)),
        ("Fitness Goal_Weight Gain", goal(FitnessGoal::GainMuscle)),
    ])
}

/// Human-readable recap of what was selected. "None" selections are omitted.
pub fn selections_summary(profile: &UserProfile, bmi: f64) -> Vec<String> {
    let mut lines = vec![
        format!("Age: {} years", profile.age),
        format!("Gender: {}", profile.gender),
        format!("Height: {} cm", profile.height_cm),
        format!("Weight: {} kg", profile.weight_kg),
        format!("BMI: {}", bmi),
        format!("Fitness Goal: {}", profile.fitness_goal),
    ];

    let conditions = selected_labels(&profile.conditions);
    if !conditions.is_empty() {
        lines.push(format!("Medical Conditions: {}", conditions.join(", ")));
    }
    if profile.severity != Severity::None {
        lines.push(format!("Severity: {}", profile.severity));
    }
    lines.push(format!("Activity Level: {}", profile.activity_level));

    let restrictions = selected_labels(&profile.dietary_restrictions);
    if !restrictions.is_empty() {
        lines.push(format!("Dietary Restrictions: {}", restrictions.join(", ")));
    }
    let allergies = selected_labels(&profile.allergies);
    if !allergies.is_empty() {
        lines.push(format!("Allergies: {}", allergies.join(", ")));
    }
    let cuisines = selected_labels(&profile.preferred_cuisine);
    if !cuisines.is_empty() {
        lines.push(format!("Preferred Cuisines: {}", cuisines.join(", ")));
    }

    lines
}

/// Everything derived from one submission.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub profile: UserProfile,
    pub bmi: f64,
    pub input: SemanticInput,
    pub submitted_at: DateTime<Utc>,
}

impl RequestContext {
    /// Validates the profile and derives BMI and the semantic input.
    pub fn new(profile: UserProfile) -> Result<Self, AppError> {
        profile.check()?;
        let bmi = calculate_bmi(profile.weight_kg, profile.height_cm);
        let input = build_semantic_input(&profile, bmi);
        Ok(Self {
            profile,
            bmi,
            input,
            submitted_at: Utc::now(),
        })
    }

    pub fn summary(&self) -> Vec<String> {
        selections_summary(&self.profile, self.bmi)
    }
}
