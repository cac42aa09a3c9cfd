//! Runtime configuration.
//!
//! Layers, lowest precedence first: built-in defaults, the JSON config file,
//! `SNAPSHOT_TIMELINE_*` environment variables, command-line flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TimelineError;
use crate::utils::environment::default_config_path;

pub const DEFAULT_HUB_URL: &str = "https://hub.snapshot.org/graphql";
pub const DEFAULT_GATEWAY_URL: &str = "https://4everland.io/ipfs";
pub const DEFAULT_SPACE: &str = "thanku.eth";
pub const MAX_PAGE_SIZE: usize = 1000;

pub const ENV_HUB_URL: &str = "SNAPSHOT_TIMELINE_HUB_URL";
pub const ENV_GATEWAY_URL: &str = "SNAPSHOT_TIMELINE_GATEWAY_URL";
pub const ENV_PAGE_SIZE: &str = "SNAPSHOT_TIMELINE_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// GraphQL endpoint of the hub
    pub hub_url: String,
    /// Base URL of the content gateway; refs are appended as a path segment
    pub gateway_url: String,
    pub page_size: usize,
    /// Load the next page when the selection is this close to the end
    pub scroll_threshold: usize,
    pub request_timeout_secs: u64,
    /// Namespace prefilled in the TUI
    pub default_space: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hub_url: DEFAULT_HUB_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            page_size: 10,
            scroll_threshold: 3,
            request_timeout_secs: 30,
            default_space: DEFAULT_SPACE.to_string(),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub hub_url: Option<String>,
    pub gateway_url: Option<String>,
    pub page_size: Option<usize>,
}

impl Config {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve every layer and validate the result.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Ok(default) if default.is_file() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;

        debug!(hub = %config.hub_url, gateway = %config.gateway_url, page_size = config.page_size, "config loaded");
        Ok(config)
    }

    /// Apply `SNAPSHOT_TIMELINE_*` values provided by `lookup`
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_HUB_URL) {
            self.hub_url = url;
        }
        if let Some(url) = lookup(ENV_GATEWAY_URL) {
            self.gateway_url = url;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer, got '{}'", ENV_PAGE_SIZE, raw))?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref url) = overrides.hub_url {
            self.hub_url = url.clone();
        }
        if let Some(ref url) = overrides.gateway_url {
            self.gateway_url = url.clone();
        }
        if let Some(size) = overrides.page_size {
            self.page_size = size;
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        validate_url("hub_url", &self.hub_url)?;
        validate_url("gateway_url", &self.gateway_url)?;

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(TimelineError::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(TimelineError::Config("request_timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_url(name: &str, value: &str) -> crate::error::Result<()> {
    let url = Url::parse(value)
        .map_err(|e| TimelineError::Config(format!("{} is not a valid URL ({}): {}", name, e, value)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TimelineError::Config(format!("{} must use http or https, got '{}'", name, other))),
    }
}
