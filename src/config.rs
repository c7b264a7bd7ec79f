use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.sankavollerei.com";
pub const DEFAULT_USER_AGENT: &str = "Komivox/1.0.0";
pub const DEFAULT_PLACEHOLDER: &str = "/placeholder-manga.jpg";

/// Client configuration. Every field has a default, so an empty TOML file is valid.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub retry: RetryConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    /// Hosts whose URLs sometimes arrive without the slash between host and path.
    pub hosts: Vec<String>,
    pub placeholder: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryConfig::default(),
            images: ImageConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self { Self { max_retries: 2, base_delay_ms: 1000 } }
}

impl Default for ImageConfig {
    fn default() -> Self {
        let hosts = ["cdn-thumbnail.komiku.org", "www.sankavollerei.com", "cdn1.komiku.org", "komiku.org", "img.komiku.org"];
        Self {
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration. An explicit path must exist and parse; the default
    /// location is optional and falls back to defaults when missing or invalid.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => default_config_path()
                .and_then(|p| fs::read_to_string(p).ok())
                .and_then(|s| toml::from_str(&s).ok())
                .unwrap_or_default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("KOMIVOX_BASE_URL") {
            if !url.trim().is_empty() { self.base_url = url.trim().to_string(); }
        }
        if let Some(secs) = std::env::var("KOMIVOX_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(n) = std::env::var("KOMIVOX_MAX_RETRIES").ok().and_then(|s| s.parse().ok()) {
            self.retry.max_retries = n;
        }
    }

    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "komivox").map(|dirs| dirs.config_dir().join("config.toml"))
}
