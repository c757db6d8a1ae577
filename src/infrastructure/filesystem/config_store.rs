use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::domain::value_objects::module_path::DEFAULT_MODULE_PREFIX;
use crate::infrastructure::filesystem::use_list_store::DEFAULT_USE_LIST_FILE;

/// Settings file looked up in the base directory
pub const DEFAULT_CONFIG_FILE: &str = "modbatch.yaml";

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Configuration file read failed: {0}")]
    ReadFailed(String),

    #[error("YAML parsing failed: {0}")]
    YamlParsingFailed(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Tool settings, read from `modbatch.yaml`.
///
/// Every key is optional in the file; missing keys fall back to
/// [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Module path prefix used by `init`
    #[validate(length(min = 1))]
    pub prefix: String,

    /// Name of the list file enumerating target directories
    #[validate(length(min = 1, max = 255))]
    pub list_file: String,

    /// Module manifest removed before `init`
    #[validate(length(min = 1, max = 255))]
    pub manifest_file: String,

    /// Build tool command; split on whitespace, so it may carry leading arguments
    #[validate(length(min = 1))]
    pub go_binary: String,

    /// Shell used to run the cleanup script
    #[validate(length(min = 1))]
    pub shell: String,

    /// Cleanup script, resolved relative to the base directory
    #[validate(length(min = 1))]
    pub clean_script: String,

    /// Per-invocation timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 86400))]
    pub timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_MODULE_PREFIX.to_string(),
            list_file: DEFAULT_USE_LIST_FILE.to_string(),
            manifest_file: "go.mod".to_string(),
            go_binary: "go".to_string(),
            shell: "sh".to_string(),
            clean_script: "clean.sh".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Reads and validates [`Settings`]
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load settings for `base_dir`.
    ///
    /// An explicit `config_path` must exist. Without one, `modbatch.yaml` in
    /// `base_dir` is used when present, otherwise the defaults.
    pub fn load(
        &self,
        config_path: Option<&Path>,
        base_dir: &Path,
    ) -> Result<Settings, ConfigStoreError> {
        let path = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigStoreError::ConfigFileNotFound(
                        path.display().to_string(),
                    ));
                }
                path.to_path_buf()
            }
            None => {
                let candidate = self.default_path(base_dir);
                if !candidate.is_file() {
                    debug!("No {} in {}, using defaults", DEFAULT_CONFIG_FILE, base_dir.display());
                    return Ok(Settings::default());
                }
                candidate
            }
        };

        self.read_settings(&path)
    }

    /// Path of the implicit settings file for `base_dir`
    pub fn default_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(DEFAULT_CONFIG_FILE)
    }

    /// Parse settings from a YAML string
    pub fn parse(&self, contents: &str) -> Result<Settings, ConfigStoreError> {
        // An empty document deserializes to unit, not to a mapping
        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }

        let settings: Settings = serde_yaml::from_str(contents)
            .map_err(|e| ConfigStoreError::YamlParsingFailed(e.to_string()))?;

        settings
            .validate()
            .map_err(|e| ConfigStoreError::ValidationFailed(e.to_string()))?;

        Ok(settings)
    }

    fn read_settings(&self, path: &Path) -> Result<Settings, ConfigStoreError> {
        debug!("Reading settings from {}", path.display());
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigStoreError::ReadFailed(format!("{}: {}", path.display(), e)))?;
        self.parse(&contents)
    }
}
