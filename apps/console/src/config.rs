use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use client_core::CacheOptions;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub stale_time_secs: u64,
    pub query_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8080".into(),
            stale_time_secs: 30,
            query_retries: 1,
        }
    }
}

impl Settings {
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            stale_time: Duration::from_secs(self.stale_time_secs),
            retries: self.query_retries,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    stale_time_secs: Option<u64>,
    query_retries: Option<u32>,
}

/// Defaults, then the config file if it exists, then environment variables.
pub fn load_settings(config_path: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file {}", config_path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.backend_url {
        settings.backend_url = v;
    }
    if let Some(v) = file_cfg.stale_time_secs {
        settings.stale_time_secs = v;
    }
    if let Some(v) = file_cfg.query_retries {
        settings.query_retries = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("KYC_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = lookup("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(parsed) = lookup("APP__STALE_TIME_SECS").and_then(|v| v.parse().ok()) {
        settings.stale_time_secs = parsed;
    }
    if let Some(parsed) = lookup("APP__QUERY_RETRIES").and_then(|v| v.parse().ok()) {
        settings.query_retries = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
