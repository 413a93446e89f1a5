// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use datadog::{Client, Credentials, DatadogConfig};

pub const DEFAULT_CONFIG_FILE: &str = "datadog-csv.yaml";

/// Connection flags shared by commands that talk to Datadog
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Datadog API key (else config file, else DD_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,
    /// Datadog application key (else config file, else DD_APP_KEY)
    #[arg(long)]
    pub app_key: Option<String>,
    /// API base URL, e.g. https://api.datadoghq.eu
    #[arg(long)]
    pub site: Option<String>,
}

/// Resolved connection settings. Nothing here has touched the network.
#[derive(Debug, Clone)]
pub struct Connection {
    pub credentials: Credentials,
    pub site: String,
}

impl ApiArgs {
    pub fn resolve_with<E>(&self, config: &DatadogConfig, env: E) -> Result<Connection>
    where
        E: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::resolve_with(
            self.api_key.as_deref(),
            self.app_key.as_deref(),
            config,
            env,
        )?;
        let site = self.site.clone().unwrap_or_else(|| config.site.clone());
        Ok(Connection { credentials, site })
    }
}

impl Connection {
    pub fn client(&self) -> Result<Client> {
        Client::new(self.credentials.clone(), &self.site)
    }
}

/// Load the config file when one was given, otherwise use defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<DatadogConfig> {
    match path {
        Some(path) => datadog::load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(DatadogConfig::default()),
    }
}

pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_flag_overrides_config() {
        let config = DatadogConfig {
            api_key: "file-api".to_string(),
            app_key: "file-app".to_string(),
            site: "https://api.datadoghq.eu".to_string(),
            ..Default::default()
        };

        let conn = ApiArgs::default().resolve_with(&config, |_| None).unwrap();
        assert_eq!(conn.site, "https://api.datadoghq.eu");
        assert_eq!(conn.credentials.api_key, "file-api");

        let args = ApiArgs {
            site: Some("https://us3.datadoghq.com".to_string()),
            ..Default::default()
        };
        let conn = args.resolve_with(&config, |_| None).unwrap();
        assert_eq!(conn.site, "https://us3.datadoghq.com");
    }

    #[test]
    fn test_no_config_file_means_defaults() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.site, datadog::DEFAULT_SITE);
        assert!(config.query.is_none());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_or_default(Some(&dir.path().join("missing.yaml"))).unwrap_err();
        assert!(err.to_string().contains("missing.yaml"));
    }
}
