//! Recommendation flow for a form submission.
//!
//! Both bundles are loaded once and kept read-only; a load failure on one side
//! only disables that side's section.

use chrono::Utc;
use tracing::{error, info};

use crate::advice::{advice_for_request, BmiBand};
use crate::engine::{ModelBundle, ModelKind, ModelLoader, Predictor};
use crate::error::AppError;
use crate::form::RequestContext;
use crate::fs_manager::{DIET_MODEL_FILENAME, GYM_MODEL_FILENAME};
use crate::models::UserProfile;
use crate::report::{ModelStatus, Report, Section, SectionOutcome, NO_MODELS_WARNING};

/// The two model bundles, each either loaded or carrying its load error.
pub struct ModelSet {
    diet: Result<ModelBundle, AppError>,
    gym: Result<ModelBundle, AppError>,
}

impl ModelSet {
    pub fn load(loader: &ModelLoader) -> Self {
        let diet = loader.load(DIET_MODEL_FILENAME);
        let gym = loader.load(GYM_MODEL_FILENAME);
        for (kind, result) in [(ModelKind::Diet, &diet), (ModelKind::Gym, &gym)] {
            match result {
                Ok(_) => info!("{} model loaded successfully", kind),
                Err(e) => error!("Failed to load {} model: {}", kind, e),
            }
        }
        Self { diet, gym }
    }

    pub fn from_parts(
        diet: Result<ModelBundle, AppError>,
        gym: Result<ModelBundle, AppError>,
    ) -> Self {
        Self { diet, gym }
    }

    pub fn get(&self, kind: ModelKind) -> Result<&ModelBundle, &AppError> {
        match kind {
            ModelKind::Diet => self.diet.as_ref(),
            ModelKind::Gym => self.gym.as_ref(),
        }
    }

    pub fn any_loaded(&self) -> bool {
        self.diet.is_ok() || self.gym.is_ok()
    }

    pub fn statuses(&self) -> Vec<ModelStatus> {
        [
            (ModelKind::Diet, DIET_MODEL_FILENAME, "Diet"),
            (ModelKind::Gym, GYM_MODEL_FILENAME, "Gym"),
        ]
        .into_iter()
        .map(|(kind, file, title)| match self.get(kind) {
            Ok(_) => ModelStatus {
                model: kind,
                file: file.to_string(),
                loaded: true,
                message: format!("{} model loaded successfully!", title),
                detail: None,
            },
            Err(e) => ModelStatus {
                model: kind,
                file: file.to_string(),
                loaded: false,
                message: format!("Failed to load {} model: {}", kind, e),
                detail: Some(e.detail()),
            },
        })
        .collect()
    }
}

pub struct Recommender {
    models: ModelSet,
    predictor: Predictor,
}

impl Recommender {
    pub fn new(models: ModelSet, predictor: Predictor) -> Self {
        Self { models, predictor }
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    /// Validates the profile and produces the full report.
    pub fn submit(&self, profile: UserProfile) -> Result<Report, AppError> {
        let ctx = RequestContext::new(profile)?;
        Ok(self.recommend(&ctx))
    }

    pub fn recommend(&self, ctx: &RequestContext) -> Report {
        let mut report = Report {
            models: self.models.statuses(),
            bmi: ctx.bmi,
            bmi_band: BmiBand::from_bmi(ctx.bmi),
            warning: None,
            sections: Vec::new(),
            advice: Vec::new(),
            summary: ctx.summary(),
            input: ctx.input.clone(),
            generated_at: Utc::now(),
        };

        if !self.models.any_loaded() {
            report.warning = Some(NO_MODELS_WARNING.to_string());
            return report;
        }

        report.sections.push(self.section(
            ctx,
            ModelKind::Gym,
            "Your Workout Recommendation",
            "Couldn't generate workout plan",
            "Workout recommendation not available (model not loaded)",
        ));
        report.sections.push(self.section(
            ctx,
            ModelKind::Diet,
            "Your Diet Recommendation",
            "Couldn't generate diet plan",
            "Diet recommendation not available (model not loaded)",
        ));

        report.advice = advice_for_request(ctx)
            .into_iter()
            .map(str::to_string)
            .collect();
        report
    }

    fn section(
        &self,
        ctx: &RequestContext,
        kind: ModelKind,
        title: &str,
        failure: &str,
        unavailable: &str,
    ) -> Section {
        let outcome = match self.models.get(kind) {
            Ok(bundle) => match self.predictor.predict(bundle, &ctx.input) {
                Ok(prediction) => SectionOutcome::Plan {
                    label: prediction.label,
                    unresolved_columns: prediction.unresolved_columns,
                },
                Err(e) => {
                    error!("{}: {}", failure, e);
                    SectionOutcome::failed(failure, &e)
                }
            },
            Err(_) => SectionOutcome::Unavailable {
                reason: unavailable.to_string(),
            },
        };

        Section {
            model: kind,
            title: title.to_string(),
            outcome,
        }
    }
}
