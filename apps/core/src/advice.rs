//! Static rule-based advice shown under the model predictions.

use serde::Serialize;

use crate::form::RequestContext;
use crate::models::{ActivityLevel, Condition};

pub const UNDERWEIGHT_ADVICE: &str =
    "Based on your BMI, consider focusing on nutrient-dense foods to reach a healthy weight.";
pub const OVERWEIGHT_ADVICE: &str =
    "Based on your BMI, consider moderate calorie restriction and increased physical activity.";
pub const OBESE_ADVICE: &str = "Based on your BMI, consider consulting with a healthcare provider for a personalized weight management plan.";
pub const DIABETES_ADVICE: &str =
    "For diabetes management, monitor carbohydrate intake and focus on low glycemic index foods.";
pub const HYPERTENSION_ADVICE: &str =
    "For hypertension management, consider the DASH diet with reduced sodium intake.";
pub const SEDENTARY_ADVICE: &str =
    "Consider gradually increasing your daily activity with short walks or light exercises.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiBand {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiBand {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiBand::Underweight
        } else if bmi < 25.0 {
            BmiBand::Normal
        } else if bmi < 30.0 {
            BmiBand::Overweight
        } else {
            BmiBand::Obese
        }
    }

    /// Advice line for the band; the normal band has none.
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            BmiBand::Underweight => Some(UNDERWEIGHT_ADVICE),
            BmiBand::Normal => None,
            BmiBand::Overweight => Some(OVERWEIGHT_ADVICE),
            BmiBand::Obese => Some(OBESE_ADVICE),
        }
    }
}

/// Advice lines for a submission, in display order.
pub fn advice_for(bmi: f64, diabetes: bool, hypertension: bool, sedentary: bool) -> Vec<&'static str> {
    let mut lines = Vec::new();
    lines.extend(BmiBand::from_bmi(bmi).advice());
    if diabetes {
        lines.push(DIABETES_ADVICE);
    }
    if hypertension {
        lines.push(HYPERTENSION_ADVICE);
    }
    if sedentary {
        lines.push(SEDENTARY_ADVICE);
    }
    lines
}

pub fn advice_for_request(ctx: &RequestContext) -> Vec<&'static str> {
    advice_for(
        ctx.bmi,
        ctx.profile.has_condition(Condition::Diabetes),
        ctx.profile.has_condition(Condition::Hypertension),
        ctx.profile.activity_level == ActivityLevel::Sedentary,
    )
}
