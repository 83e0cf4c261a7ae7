// src/core/config_manager.rs
//! Layered configuration: defaults, optional YAML file, environment, CLI flags

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::upload_form::{FileRules, DEFAULT_MAX_UPLOAD_BYTES};

pub const DEFAULT_CONFIG_FILE: &str = "resume-feedback.yaml";
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:5001/analyze";
pub const DEFAULT_LOG_FILE: &str = "/tmp/resume-feedback.log";

pub const CONFIG_PATH_VAR: &str = "RESUME_FEEDBACK_CONFIG";
pub const ENDPOINT_URL_VAR: &str = "ANALYZE_ENDPOINT_URL";
pub const TIMEOUT_VAR: &str = "ANALYZE_TIMEOUT_SECONDS";
pub const LOG_FILE_VAR: &str = "RESUME_FEEDBACK_LOG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigManager {
    pub service: ServiceConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint_url: String,
    /// Unset means the HTTP transport default
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// `null` disables the client-side limit
    pub max_upload_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl ConfigManager {
    /// Load all configuration layers from the process environment
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigManager::load`] with an injectable environment lookup
    pub fn load_with<F>(explicit_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_path = lookup(CONFIG_PATH_VAR).map(PathBuf::from);
        let mut config = match explicit_path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(lookup)?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Invalid configuration YAML")
    }

    /// Environment variables win over the file
    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENDPOINT_URL_VAR) {
            self.service.endpoint_url = url;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_VAR))?;
            self.service.timeout_seconds = Some(secs);
        }

        if let Some(path) = lookup(LOG_FILE_VAR) {
            self.logging.log_file = PathBuf::from(path);
        }

        Ok(())
    }

    /// CLI flag, the last layer
    pub fn with_endpoint(mut self, endpoint_url: Option<String>) -> Self {
        if let Some(url) = endpoint_url {
            self.service.endpoint_url = url;
        }
        self
    }

    pub fn file_rules(&self) -> FileRules {
        FileRules {
            max_upload_bytes: self.upload.max_upload_bytes,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration")
    }
}
