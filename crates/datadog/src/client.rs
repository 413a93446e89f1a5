// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::config::Credentials;
use crate::models::{QueryResponse, ValidateResponse};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use diagnostics::*;
use std::time::Duration;
use url::Url;
use widetable::{FetchError, Series, SeriesFetcher};

const TIMEOUT_SECONDS: u64 = 60;

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

/// Async Datadog metrics API client
#[derive(Clone)]
pub struct Client {
    http_client: reqwest::Client,
    credentials: Credentials,
    site: Url,
}

impl Client {
    /// Create a client for the API rooted at `site`, e.g. `https://api.datadoghq.eu`.
    pub fn new(credentials: Credentials, site: &str) -> Result<Self> {
        let mut site = Url::parse(site).with_context(|| format!("Invalid site URL: {}", site))?;
        if site.cannot_be_a_base() {
            return Err(anyhow!("Invalid site URL: {}", site));
        }
        // Endpoints are joined relative to the site, so keep its last segment.
        if !site.path().ends_with('/') {
            let path = format!("{}/", site.path());
            site.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Client {
            http_client,
            credentials,
            site,
        })
    }

    /// Check that the API key is accepted.
    pub async fn validate_keys(&self) -> Result<()> {
        let url = self.validate_url()?;
        let response: ValidateResponse = self.fetch_json(url).await?;
        if !response.valid {
            return Err(anyhow!("Datadog rejected the API key"));
        }
        Ok(())
    }

    /// Run a metrics query over `[from, to)` (epoch seconds).
    pub async fn query_metrics(&self, from: i64, to: i64, query: &str) -> Result<QueryResponse> {
        let url = self.query_url(from, to, query)?;
        let response: QueryResponse = self.fetch_json(url).await?;

        if response.status == "error" || response.error.is_some() {
            let message = response.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(anyhow!("Datadog query '{}' failed: {}", query, message));
        }

        let series_count = response.series.len();
        debug!("Query returned {series_count} series", series_count: series_count);
        Ok(response)
    }

    /// Generic JSON fetch with API key headers
    async fn fetch_json<T>(&self, url: Url) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let path = url.path().to_string();
        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .header(APP_KEY_HEADER, &self.credentials.app_key)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("HTTP {} error from {}: {}", status, path, error_text));
        }

        let json_text = response
            .text()
            .await
            .with_context(|| "Failed to read response body")?;

        serde_json::from_str(&json_text)
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    // URL construction helpers
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.site
            .join(path)
            .with_context(|| format!("Failed to build URL for {}", path))
    }

    fn query_url(&self, from: i64, to: i64, query: &str) -> Result<Url> {
        let mut url = self.endpoint("api/v1/query")?;
        url.query_pairs_mut()
            .append_pair("from", &from.to_string())
            .append_pair("to", &to.to_string())
            .append_pair("query", query);
        Ok(url)
    }

    fn validate_url(&self) -> Result<Url> {
        self.endpoint("api/v1/validate")
    }
}

#[async_trait]
impl SeriesFetcher for Client {
    async fn fetch(&self, start: i64, end: i64, query: &str) -> Result<Vec<Series>, FetchError> {
        let response = self.query_metrics(start, end, query).await?;
        let series = response
            .series
            .into_iter()
            .map(|data| data.into_series())
            .collect::<Result<Vec<_>>>()?;
        Ok(series)
    }
}
