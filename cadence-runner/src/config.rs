//! Configuration loading from cadence.toml
//!
//! Runner configuration lives in a `cadence.toml` file discovered by
//! walking up from the current directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Override every subject's configured iteration count; applied with
    /// `Runner::with_iteration_override`
    #[serde(default)]
    pub iterations: Option<u32>,
    /// Show a terminal progress bar
    #[serde(default = "default_progress")]
    pub progress: bool,
    /// Unit used when rendering times ("microseconds", "milliseconds", ...)
    #[serde(default = "default_time_unit")]
    pub time_unit: String,
    /// Context label attached to persisted runs
    #[serde(default)]
    pub context: Option<String>,
    /// Path of the historical-results store
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            iterations: None,
            progress: default_progress(),
            time_unit: default_time_unit(),
            context: None,
            storage_path: default_storage_path(),
        }
    }
}

fn default_progress() -> bool {
    true
}
fn default_time_unit() -> String {
    "microseconds".to_string()
}
fn default_storage_path() -> String {
    ".cadence/history.db".to_string()
}

impl RunnerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Discover and load configuration by walking up from the current
    /// directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("cadence.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert!(config.iterations.is_none());
        assert!(config.progress);
        assert_eq!(config.time_unit, "microseconds");
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            iterations = 10
            progress = false
            time_unit = "milliseconds"
        "#;

        let config: RunnerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.iterations, Some(10));
        assert!(!config.progress);
        assert_eq!(config.time_unit, "milliseconds");
        // Defaults still apply
        assert_eq!(config.storage_path, ".cadence/history.db");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "context = \"ci\"").unwrap();

        let config = RunnerConfig::load(file.path()).unwrap();
        assert_eq!(config.context.as_deref(), Some("ci"));
    }
}
