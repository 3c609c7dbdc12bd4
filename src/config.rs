//! Service configuration
//!
//! TOML file loaded at startup, created with defaults on first run. Every
//! section is optional; omitted keys fall back to local-development
//! defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::gateway::{DEFAULT_FAST_MODEL, DEFAULT_HEAVY_MODEL, DEFAULT_MODEL_URL};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the coaching API binds to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8600".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Ollama-compatible generation endpoint
    pub base_url: String,

    /// Model tag for the fast tier
    pub fast_model: String,

    /// Model tag for the heavy tier (weekly reports)
    pub heavy_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MODEL_URL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            heavy_model: DEFAULT_HEAVY_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Base URL of the data service owning users, sessions, and feedback.
    /// When absent the service runs against a seeded in-memory store,
    /// which is only useful for local development.
    pub base_url: Option<String>,
}

impl Config {
    /// Load from an explicit path, or from the default location (creating
    /// a default file there on first run)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&contents).context("failed to parse config file")
            }
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    let config = Config::default();
                    config.save(&path)?;
                    return Ok(config);
                }
                let contents = fs::read_to_string(&path).context("failed to read config file")?;
                toml::from_str(&contents).context("failed to parse config file")
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create config directory")?;
        }
        let toml_string = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, toml_string).context("failed to write config file")?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(".pomocoach").join("config.toml"))
    }
}
