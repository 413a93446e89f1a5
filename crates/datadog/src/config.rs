// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::models::DatadogConfig;
use anyhow::{Context, Result};
use std::path::Path;
use widetable::IntervalCatalog;

pub const API_KEY_ENV: &str = "DD_API_KEY";
pub const APP_KEY_ENV: &str = "DD_APP_KEY";

/// Load configuration from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DatadogConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

    let config: DatadogConfig = serde_yaml_ng::from_str(&content)
        .with_context(|| "Failed to parse YAML configuration")?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
///
/// Keys may be empty here; they can still arrive from flags or environment.
pub fn validate_config(config: &DatadogConfig) -> Result<()> {
    let site = url::Url::parse(&config.site)
        .with_context(|| format!("Invalid site URL: {}", config.site))?;
    if site.cannot_be_a_base() {
        anyhow::bail!("Invalid site URL: {}", config.site);
    }

    if let Some(query) = &config.query {
        if query.trim().is_empty() {
            anyhow::bail!("query cannot be empty when present");
        }
    }

    if let Some(interval) = &config.interval {
        IntervalCatalog::standard().lookup(interval)?;
    }

    Ok(())
}

/// Write an example configuration file. Never overwrites.
pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        anyhow::bail!("Configuration file already exists: {}", path.display());
    }

    let example = DatadogConfig {
        api_key: "your-api-key".to_string(),
        app_key: "your-application-key".to_string(),
        query: Some("avg:system.cpu.user{*} by {host}".to_string()),
        interval: Some(widetable::DEFAULT_INTERVAL.to_string()),
        ..Default::default()
    };

    let yaml = serde_yaml_ng::to_string(&example)
        .with_context(|| "Failed to serialize example configuration")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

/// API and application keys for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub app_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &preview(&self.api_key))
            .field("app_key", &preview(&self.app_key))
            .finish()
    }
}

/// First few characters of a secret, for messages.
pub fn preview(secret: &str) -> String {
    if secret.chars().count() > 4 {
        format!("{}...", secret.chars().take(4).collect::<String>())
    } else {
        "****".to_string()
    }
}

impl Credentials {
    /// Resolve keys from flags, then the config file, then the environment.
    pub fn resolve(
        api_flag: Option<&str>,
        app_flag: Option<&str>,
        config: &DatadogConfig,
    ) -> Result<Self> {
        Self::resolve_with(api_flag, app_flag, config, |name| std::env::var(name).ok())
    }

    pub fn resolve_with<E>(
        api_flag: Option<&str>,
        app_flag: Option<&str>,
        config: &DatadogConfig,
        env: E,
    ) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let pick = |flag: Option<&str>, file: &str, var: &str, what: &str| -> Result<String> {
            flag.map(str::to_string)
                .filter(|v| !v.is_empty())
                .or_else(|| Some(file.to_string()).filter(|v| !v.is_empty()))
                .or_else(|| env(var).filter(|v| !v.is_empty()))
                .with_context(|| {
                    format!("No {what} given: pass it as a flag, in the config file, or set {var}")
                })
        };

        Ok(Self {
            api_key: pick(api_flag, &config.api_key, API_KEY_ENV, "API key")?,
            app_key: pick(app_flag, &config.app_key, APP_KEY_ENV, "application key")?,
        })
    }
}
