// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use widetable::Series;

/// Default Datadog API endpoint (US1 site).
pub const DEFAULT_SITE: &str = "https://api.datadoghq.com";

fn default_site() -> String {
    DEFAULT_SITE.to_string()
}

/// Credentials, endpoint and default query settings read from YAML.
///
/// Every field may be overridden on the command line; keys may also come
/// from the DD_API_KEY / DD_APP_KEY environment variables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatadogConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub app_key: String,
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_file: Option<String>,
}

impl Default for DatadogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            app_key: String::new(),
            site: default_site(),
            query: None,
            interval: None,
            csv_file: None,
        }
    }
}

/// Response of `GET /api/v1/query`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QueryResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub res_type: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub from_date: Option<i64>,
    #[serde(default)]
    pub to_date: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub series: Vec<SeriesData>,
}

/// One series of a query response.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SeriesData {
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub interval: Option<i64>,
    /// `[timestamp_ms, value]` pairs; the value is null for gaps.
    #[serde(default)]
    pub pointlist: Vec<(f64, Option<f64>)>,
}

impl SeriesData {
    /// Column name for this series: its scope, or the metric name when the
    /// response carries no scope.
    pub fn column_name(&self) -> &str {
        match self.scope.as_deref() {
            Some(scope) if !scope.is_empty() => scope,
            _ => &self.metric,
        }
    }

    /// Convert to a `Series`. Fails on a timestamp that is not a finite
    /// number of milliseconds within the `i64` range.
    pub fn into_series(self) -> Result<Series> {
        let name = self.column_name().to_string();
        let mut points = Vec::with_capacity(self.pointlist.len());
        for (ts, value) in self.pointlist {
            points.push((timestamp_millis(ts, &name)?, value));
        }
        Ok(Series::new(name, points))
    }
}

fn timestamp_millis(ts: f64, name: &str) -> Result<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if !ts.is_finite() || ts < i64::MIN as f64 || ts >= i64::MAX as f64 {
        bail!("Series '{}' has an invalid point timestamp: {}", name, ts);
    }
    Ok(ts as i64)
}

/// Response of `GET /api/v1/validate`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ValidateResponse {
    #[serde(default)]
    pub valid: bool,
}
