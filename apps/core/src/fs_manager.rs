use std::path::PathBuf;
use tracing::error;

/// File name of the diet plan artifact inside the model directory.
pub const DIET_MODEL_FILENAME: &str = "diet_model.pkl";
/// File name of the gym plan artifact inside the model directory.
pub const GYM_MODEL_FILENAME: &str = "gym_model.pkl";

pub struct PortablePathManager;

impl PortablePathManager {
    /// Root directory of the application (where the executable lives), not the
    /// process working directory.
    pub fn root_dir() -> PathBuf {
        let exe_dir = match std::env::current_exe() {
            Ok(mut path) => {
                path.pop(); // remove exe name
                path
            }
            Err(e) => {
                error!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            }
        };

        #[cfg(debug_assertions)]
        {
            // target/debug/fitcoach -> workspace root
            let mut workspace = exe_dir.clone();
            workspace.pop(); // remove debug
            workspace.pop(); // remove target

            let core_path = workspace.join("apps").join("core");
            if core_path.exists() {
                tracing::debug!("Using development root {:?}", core_path);
                return core_path;
            }
        }

        exe_dir
    }

    /// Default model directory (`<root>/model`).
    pub fn models_dir() -> PathBuf {
        Self::root_dir().join("model")
    }

    /// Names of the artifacts the application expects to find.
    pub fn model_files() -> [&'static str; 2] {
        [DIET_MODEL_FILENAME, GYM_MODEL_FILENAME]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_dir_is_under_root() {
        let root = PortablePathManager::root_dir();
        assert_eq!(PortablePathManager::models_dir(), root.join("model"));
    }

    #[test]
    fn test_model_files() {
        assert_eq!(
            PortablePathManager::model_files(),
            ["diet_model.pkl", "gym_model.pkl"]
        );
    }
}
