//! Application configuration
//!
//! Loaded from `~/.config/alocacao-cli/config.toml`. Every value has a
//! default so a missing file is not an error; CLI flags override whatever
//! the file provides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "alocacao-cli";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the portal exports drop spreadsheets into
    pub input_dir: PathBuf,
    /// Shift rows must match exactly, e.g. "05/11/2023 - Tarde"
    pub shift_key: String,
    /// Where the consolidated JSON report is written
    pub output_path: PathBuf,
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    pub remote: String,
    pub branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from("base_planilha"),
            shift_key: "05/11/2023 - Tarde".to_string(),
            output_path: PathBuf::from("dados.json"),
            publish: PublishConfig::default(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            enabled: true,
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.shift_key, "05/11/2023 - Tarde");
        assert_eq!(config.output_path, PathBuf::from("dados.json"));
        assert!(config.publish.enabled);
        assert_eq!(config.publish.remote, "origin");
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "input_dir = \"/srv/planilhas\"\n\n[publish]\nenabled = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("/srv/planilhas"));
        assert!(!config.publish.enabled);
        // Untouched values fall back to defaults.
        assert_eq!(config.shift_key, "05/11/2023 - Tarde");
        assert_eq!(config.publish.branch, "main");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "input_dir = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
