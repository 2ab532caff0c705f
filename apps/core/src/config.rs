//! Runtime configuration.
//!
//! Sources, lowest priority first: built-in defaults, the environment (a `.env`
//! file is loaded into it at startup), command-line overrides.

use std::path::PathBuf;

use crate::engine::StrictMode;
use crate::error::AppError;
use crate::fs_manager::PortablePathManager;

pub const ENV_MODEL_DIR: &str = "FITCOACH_MODEL_DIR";
pub const ENV_STRICT_FEATURES: &str = "FITCOACH_STRICT_FEATURES";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub strict: StrictMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PortablePathManager::models_dir(),
            strict: StrictMode::Off,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `FITCOACH_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(dir) = read_env(ENV_MODEL_DIR)? {
            config.model_dir = PathBuf::from(dir);
        }
        if let Some(mode) = read_env(ENV_STRICT_FEATURES)? {
            config.strict = mode.parse()?;
        }

        Ok(config)
    }

    /// Applies command-line values on top of the current settings.
    pub fn with_overrides(mut self, model_dir: Option<PathBuf>, strict: Option<StrictMode>) -> Self {
        if let Some(dir) = model_dir {
            self.model_dir = dir;
        }
        if let Some(strict) = strict {
            self.strict = strict;
        }
        self
    }
}

fn read_env(key: &str) -> Result<Option<String>, AppError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => {
            Err(AppError::Config(format!("{} is not valid UTF-8", key)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars_unset([ENV_MODEL_DIR, ENV_STRICT_FEATURES], || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config, AppConfig::default());
        });
    }

    #[test]
    fn test_env_overrides_defaults() {
        temp_env::with_vars(
            [
                (ENV_MODEL_DIR, Some("/srv/models")),
                (ENV_STRICT_FEATURES, Some("WARN")),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
                assert_eq!(config.strict, StrictMode::Warn);
            },
        );
    }

    #[test]
    fn test_invalid_strict_mode_is_config_error() {
        temp_env::with_var(ENV_STRICT_FEATURES, Some("sometimes"), || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
    }

    #[test]
    fn test_cli_overrides_env() {
        temp_env::with_var(ENV_MODEL_DIR, Some("/srv/models"), || {
            let config = AppConfig::from_env()
                .unwrap()
                .with_overrides(Some(PathBuf::from("./model")), Some(StrictMode::Fail));
            assert_eq!(config.model_dir, PathBuf::from("./model"));
            assert_eq!(config.strict, StrictMode::Fail);
        });
    }
}
