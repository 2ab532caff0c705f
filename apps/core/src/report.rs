//! Submission report and its text rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::advice::BmiBand;
use crate::engine::{ModelKind, SemanticInput};
use crate::error::AppError;

pub const NO_MODELS_WARNING: &str =
    "Cannot generate recommendations because models failed to load.";

/// Whether a bundle made it through loading.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub model: ModelKind,
    pub file: String,
    pub loaded: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of one model's section of the page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Plan {
        label: String,
        unresolved_columns: Vec<String>,
    },
    Failed {
        kind: String,
        message: String,
        detail: String,
    },
    Unavailable {
        reason: String,
    },
}

impl SectionOutcome {
    pub fn failed(context: &str, err: &AppError) -> Self {
        SectionOutcome::Failed {
            kind: err.kind().to_string(),
            message: format!("{}: {}", context, err),
            detail: err.detail(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            SectionOutcome::Plan { label, .. } => Some(label),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub model: ModelKind,
    pub title: String,
    pub outcome: SectionOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub models: Vec<ModelStatus>,
    pub bmi: f64,
    pub bmi_band: BmiBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub sections: Vec<Section>,
    pub advice: Vec<String>,
    pub summary: Vec<String>,
    pub input: SemanticInput,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn section(&self, model: ModelKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.model == model)
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the report for a terminal. `debug` adds the semantic input, a
    /// recap of the selections and technical error details.
    pub fn render_text(&self, debug: bool) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out, debug);
        out
    }

    fn write_text(&self, out: &mut String, debug: bool) -> std::fmt::Result {
        for status in &self.models {
            let tag = if status.loaded { "ok" } else { "error" };
            writeln!(out, "[{}] {}", tag, status.message)?;
            if debug {
                if let Some(detail) = &status.detail {
                    writeln!(out, "      {}", detail)?;
                }
            }
        }
        writeln!(out)?;
        writeln!(out, "Calculated BMI: {}", self.bmi)?;

        if let Some(warning) = &self.warning {
            writeln!(out)?;
            writeln!(out, "[warning] {}", warning)?;
            return Ok(());
        }

        if debug {
            writeln!(out)?;
            writeln!(out, "Debug: Input Data")?;
            for (key, value) in self.input.iter() {
                writeln!(out, "  {}: {}", key, value)?;
            }
            writeln!(out)?;
            writeln!(out, "Your Selections Summary")?;
            for line in &self.summary {
                writeln!(out, "  - {}", line)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Here are your personalized plans!")?;

        for section in &self.sections {
            writeln!(out)?;
            match &section.outcome {
                SectionOutcome::Plan { label, .. } => {
                    writeln!(out, "{}", section.title)?;
                    writeln!(out, "  Plan: {}", label)?;
                }
                SectionOutcome::Failed {
                    message, detail, ..
                } => {
                    writeln!(out, "{}", section.title)?;
                    writeln!(out, "  [error] {}", message)?;
                    if debug {
                        writeln!(out, "  Error Details: {}", detail)?;
                    }
                }
                SectionOutcome::Unavailable { reason } => {
                    writeln!(out, "[warning] {}", reason)?;
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "Additional Recommendations")?;
        for line in &self.advice {
            writeln!(out, "  - {}", line)?;
        }

        Ok(())
    }
}
