use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result, anyhow};

use crate::models::MessageGenerationConfig;
use crate::provider::{LlmProvider, MessageType};

/// Environment variable that overrides the configured backend URL.
pub const BACKEND_URL_ENV: &str = "OUTREACH_BACKEND_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub backend_url: Option<String>,
    pub default_provider: Option<String>,
    pub default_message_type: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Pick the backend URL: explicit flag, then environment, then this file.
    pub fn resolve_backend_url(
        &self,
        flag: Option<&str>,
        env: Option<&str>,
    ) -> Result<String> {
        [flag, env, self.backend_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "no backend URL configured; pass --backend-url, set {}, or add \"backend_url\" to {}",
                    BACKEND_URL_ENV,
                    Self::get_config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Starting values for the message generation settings.
    pub fn generation_defaults(&self) -> MessageGenerationConfig {
        MessageGenerationConfig {
            target_id: String::new(),
            message_type: self
                .default_message_type
                .as_deref()
                .and_then(MessageType::from_str)
                .unwrap_or_default(),
            llm_provider: self
                .default_provider
                .as_deref()
                .and_then(LlmProvider::from_str)
                .unwrap_or_default(),
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("outreach").join("config.json"))
    }
}

/// API root for a backend URL: trailing slashes dropped, `/api` appended.
pub fn api_base(backend_url: &str) -> String {
    format!("{}/api", backend_url.trim_end_matches('/'))
}
