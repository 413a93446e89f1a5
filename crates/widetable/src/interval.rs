// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Supported sampling intervals and the query window each one needs.
//!
//! The backend picks its rollup resolution from the span of a query. Holding
//! the span at a fixed multiple of the desired interval keeps the returned
//! resolution constant across every window of a run.

use crate::error::{Error, Result};
use chrono::TimeDelta;

/// Query window length, in samples, for every catalog entry.
pub const WINDOW_RATIO: i64 = 288;

/// Interval used when none is requested.
pub const DEFAULT_INTERVAL: &str = "1h";

/// One row of the interval catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSpec {
    token: &'static str,
    sample_minutes: i64,
    window_hours: i64,
}

impl IntervalSpec {
    const fn new(token: &'static str, sample_minutes: i64, window_hours: i64) -> Self {
        Self {
            token,
            sample_minutes,
            window_hours,
        }
    }

    pub fn token(&self) -> &'static str {
        self.token
    }

    /// Spacing between samples in the exported data.
    pub fn sample_interval(&self) -> TimeDelta {
        TimeDelta::minutes(self.sample_minutes)
    }

    /// Span of a single backend query.
    pub fn query_window(&self) -> TimeDelta {
        TimeDelta::hours(self.window_hours)
    }
}

static INTERVALS: [IntervalSpec; 10] = [
    IntervalSpec::new("5m", 5, 24),
    IntervalSpec::new("10m", 10, 48),
    IntervalSpec::new("20m", 20, 96),
    IntervalSpec::new("30m", 30, 144),
    IntervalSpec::new("1h", 60, 288),
    IntervalSpec::new("2h", 120, 576),
    IntervalSpec::new("4h", 240, 1152),
    IntervalSpec::new("8h", 480, 2304),
    IntervalSpec::new("12h", 720, 3456),
    IntervalSpec::new("24h", 1440, 6912),
];

static STANDARD: IntervalCatalog = IntervalCatalog { specs: &INTERVALS };

/// Immutable, closed set of interval tokens.
#[derive(Debug)]
pub struct IntervalCatalog {
    specs: &'static [IntervalSpec],
}

impl IntervalCatalog {
    pub fn standard() -> &'static IntervalCatalog {
        &STANDARD
    }

    /// Case-sensitive exact lookup. Unknown tokens list the valid ones.
    pub fn lookup(&self, token: &str) -> Result<&'static IntervalSpec> {
        self.iter()
            .find(|spec| spec.token == token)
            .ok_or_else(|| Error::UnknownInterval {
                token: token.to_string(),
                valid: self.tokens().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + use<> {
        let specs: &'static [IntervalSpec] = self.specs;
        specs.iter().map(|spec| spec.token)
    }

    pub fn iter(&self) -> std::slice::Iter<'static, IntervalSpec> {
        let specs: &'static [IntervalSpec] = self.specs;
        specs.iter()
    }
}
