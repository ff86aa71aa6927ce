//! Tacklesmith configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Tacklesmith configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TacklesmithConfig {
    /// Gallery storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Generation model configuration
    #[serde(default)]
    pub model: ModelConfig,
}

impl TacklesmithConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Gallery storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the gallery file
    pub path: PathBuf,

    /// Maximum serialized gallery size in bytes; 0 means unbounded.
    /// When set, commits that would exceed it go through the degradation
    /// cascade just like a full filesystem would trigger.
    pub max_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("gallery.json"),
            max_bytes: 0,
        }
    }
}

/// Generation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the generateContent API
    pub endpoint: String,

    /// Model used for concept generation
    pub concept_model: String,

    /// Model used for image generation
    pub visual_model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            concept_model: "gemini-2.5-flash".to_string(),
            visual_model: "gemini-2.5-flash-image".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

/// Default data directory (~/.tacklesmith/)
pub fn default_data_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tacklesmith")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TacklesmithConfig::default();
        assert_eq!(config.storage.max_bytes, 0);
        assert!(config.storage.path.ends_with("gallery.json"));
        assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_from_file_partial_sections() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\npath = \"/tmp/g.json\"\nmax_bytes = 4096\n",
        )
        .unwrap();

        let config = TacklesmithConfig::from_file(&path).unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/tmp/g.json"));
        assert_eq!(config.storage.max_bytes, 4096);
        // Missing section falls back to defaults
        assert_eq!(config.model.concept_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        assert!(matches!(
            TacklesmithConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }
}
