// src/config/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use ::config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

pub const APP_DIR: &str = "comment-insight";
pub const ENV_PREFIX: &str = "COMMENT_INSIGHT";

/// Client settings: defaults, then the config file, then `COMMENT_INSIGHT_*`
/// environment variables, then command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
    /// The backend analyses the CSV before answering, so uploads get a long timeout.
    pub upload_timeout_secs: u64,
    pub start_path: String,
    /// Tag key whose value is shown as a magnitude rather than a flag.
    pub urgency_tag: String,
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            upload_timeout_secs: 600,
            start_path: "/".to_string(),
            urgency_tag: "緊急性".to_string(),
            font_path: None,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.ron"))
    }

    /// Load the layered configuration.
    ///
    /// An explicit file must exist. Without one, `config.*` in the user config
    /// directory is read if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => match dirs::config_dir() {
                Some(dir) => {
                    let stem = dir.join(APP_DIR).join("config");
                    builder.add_source(File::with_name(&stem.to_string_lossy()).required(false))
                }
                None => builder,
            },
        };

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn apply_overrides(&mut self, server_url: Option<String>, start_path: Option<String>) {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(path) = start_path {
            self.start_path = path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.server_url.trim();
        if url.is_empty() {
            return Err(anyhow!("Server URL must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("Server URL must start with http:// or https://: {}", url));
        }
        if self.request_timeout_secs == 0 || self.upload_timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be at least one second"));
        }
        if !self.start_path.starts_with('/') {
            return Err(anyhow!("Start path must begin with '/': {}", self.start_path));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}
