use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use super::backtracking_solver::DEFAULT_MAX_ITERATIONS;
use super::constraint_solver::DEFAULT_MAX_STEPS;
use crate::error::PuzzleError;

const CURRENT_VERSION: u32 = 2;

pub const ENV_MAX_STEPS: &str = "CROSSNUMBER_MAX_STEPS";
pub const ENV_MAX_ITERATIONS: &str = "CROSSNUMBER_MAX_ITERATIONS";
pub const ENV_UNIQUE_ANSWERS: &str = "CROSSNUMBER_UNIQUE_ANSWERS";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SolverSettings {
    #[serde(default = "default_version")]
    version: u32,

    /// Propagation rounds allowed per `solve()`.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Hypothesis passes allowed per backtracking run.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_true")]
    pub unique_answers: bool,
}

// Helper functions for default values
fn default_version() -> u32 {
    CURRENT_VERSION
}
fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}
fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}
fn default_true() -> bool {
    true
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            version: CURRENT_VERSION,
            max_steps: DEFAULT_MAX_STEPS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            unique_answers: true,
        }
    }
}

impl SolverSettings {
    pub fn load(path: &Path) -> Result<Self, PuzzleError> {
        let contents = fs::read_to_string(path)?;
        let mut settings: SolverSettings = serde_json::from_str(&contents)?;
        settings.migrate();
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), PuzzleError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn migrate(&mut self) {
        match self.version {
            0 | 1 => {
                self.version = CURRENT_VERSION;
            }
            _ => (),
        }
    }

    /// Apply `CROSSNUMBER_*` environment variables on top of these settings.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(max_steps) = env_value(ENV_MAX_STEPS) {
            self.max_steps = max_steps;
        }
        if let Some(max_iterations) = env_value(ENV_MAX_ITERATIONS) {
            self.max_iterations = max_iterations;
        }
        if let Some(unique_answers) = env_value(ENV_UNIQUE_ANSWERS) {
            self.unique_answers = unique_answers;
        }
        self
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_env() {
        for key in [ENV_MAX_STEPS, ENV_MAX_ITERATIONS, ENV_UNIQUE_ANSWERS] {
            std::env::remove_var(key);
        }
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("crossnumber-settings-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let settings: SolverSettings = serde_json::from_str(r#"{"max_steps": 7}"#).unwrap();
        assert_eq!(settings.max_steps, 7);
        assert_eq!(settings.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(settings.unique_answers);
        assert_eq!(settings.version(), CURRENT_VERSION);
    }

    #[test]
    fn test_unversioned_file_keeps_zero_iterations() {
        let path = scratch_path("unversioned.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"max_iterations": 0}"#).unwrap();
        let settings = SolverSettings::load(&path).unwrap();
        assert_eq!(settings.max_iterations, 0);
        assert_eq!(settings.version(), CURRENT_VERSION);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_path("roundtrip.json");
        let settings = SolverSettings {
            max_steps: 3,
            unique_answers: false,
            ..SolverSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(SolverSettings::load(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_migrates_old_versions() {
        let path = scratch_path("old.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"version": 0, "max_steps": 9, "max_iterations": 0}"#).unwrap();
        let settings = SolverSettings::load(&path).unwrap();
        assert_eq!(settings.version(), CURRENT_VERSION);
        assert_eq!(settings.max_steps, 9);
        assert_eq!(settings.max_iterations, 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            SolverSettings::load(&scratch_path("missing.json")),
            Err(PuzzleError::Io(_))
        ));

        let path = scratch_path("broken.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            SolverSettings::load(&path),
            Err(PuzzleError::Settings(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var(ENV_MAX_STEPS, "4");
        std::env::set_var(ENV_UNIQUE_ANSWERS, "false");
        let settings = SolverSettings::default().with_env_overrides();
        assert_eq!(settings.max_steps, 4);
        assert_eq!(settings.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(!settings.unique_answers);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_overrides_ignore_invalid_values() {
        clear_env();
        std::env::set_var(ENV_MAX_ITERATIONS, "lots");
        let settings = SolverSettings::default().with_env_overrides();
        assert_eq!(settings, SolverSettings::default());
        clear_env();
    }
}
