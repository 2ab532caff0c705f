//! Preflight Check System
//!
//! Verifies the model directory and both artifacts before any form is
//! submitted, and reports the runtime environment for troubleshooting.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::ModelLoader;
use crate::fs_manager::PortablePathManager;

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    /// At least one model can serve predictions.
    pub ready_to_start: bool,
    pub model_dir: String,
    pub working_dir: String,
    pub version: String,
    pub summary: String,
}

impl PreflightReport {
    pub fn render_text(&self) -> String {
        let mut lines = vec!["Model Files Check:".to_string()];
        for check in &self.checks {
            let status = if check.passed { "OK" } else { "FAILED" };
            lines.push(format!("  {}: {} - {}", check.name, status, check.message));
            if let Some(details) = &check.details {
                lines.push(format!("      {}", details));
            }
        }
        lines.push(format!("Model Directory: {}", self.model_dir));
        lines.push(format!("Current Directory: {}", self.working_dir));
        lines.push(format!("Version: {}", self.version));
        lines.push(self.summary.clone());
        lines.join("\n")
    }
}

/// Performs all preflight checks and returns a report.
pub fn run_preflight_checks(loader: &ModelLoader) -> PreflightReport {
    info!("Running preflight checks");

    let mut checks = vec![check_model_dir(loader)];
    for file in PortablePathManager::model_files() {
        checks.push(check_model_file(loader, file));
    }

    let all_passed = checks.iter().all(|c| c.passed);
    let models_ok = checks
        .iter()
        .filter(|c| c.name != "model_dir" && c.passed)
        .count();

    let summary = if all_passed {
        "All checks passed. System ready.".to_string()
    } else if models_ok > 0 {
        "One model is unavailable. Recommendations will be partial.".to_string()
    } else {
        "No model could be loaded. Recommendations are disabled.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  {}: {}", check.name, check.message);
        } else {
            warn!("  {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }

    PreflightReport {
        all_passed,
        checks,
        ready_to_start: models_ok > 0,
        model_dir: loader.model_dir().display().to_string(),
        working_dir: std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|e| format!("<unavailable: {}>", e)),
        version: env!("CARGO_PKG_VERSION").to_string(),
        summary,
    }
}

fn check_model_dir(loader: &ModelLoader) -> CheckResult {
    let dir = loader.model_dir();
    if dir.is_dir() {
        CheckResult::pass("model_dir", "Model directory exists")
    } else {
        CheckResult::fail(
            "model_dir",
            "Model directory not found",
            Some(format!("Expected at: {:?}", dir)),
        )
    }
}

fn check_model_file(loader: &ModelLoader, file: &str) -> CheckResult {
    let path = loader.path_for(file);
    if !path.exists() {
        return CheckResult::fail(
            file,
            "Model file not found",
            Some(format!("Expected at: {:?}", path)),
        );
    }

    match loader.load(file) {
        Ok(bundle) => CheckResult::pass(
            file,
            &format!(
                "{}, {} features, {} classes",
                bundle.estimator().describe(),
                bundle.feature_columns().len(),
                bundle.labels().classes().len()
            ),
        ),
        Err(e) => CheckResult::fail(file, "Model file cannot be loaded", Some(e.to_string())),
    }
}
