// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::FetchError;
use async_trait::async_trait;

/// One sample. `value` is `None` when the backend reported no value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub timestamp_ms: i64,
    pub value: Option<f64>,
}

impl Point {
    pub fn new(timestamp_ms: i64, value: Option<f64>) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// Timestamp truncated to whole epoch seconds.
    pub fn timestamp_secs(&self) -> i64 {
        self.timestamp_ms.div_euclid(1000)
    }
}

/// A named sequence of samples returned for one query window.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new<I>(name: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (i64, Option<f64>)>,
    {
        Self {
            name: name.into(),
            points: points
                .into_iter()
                .map(|(ts, value)| Point::new(ts, value))
                .collect(),
        }
    }
}

/// Source of series data for one window.
///
/// `start` and `end` are epoch seconds. Series order must be stable within
/// one call; it need not be stable across calls. An empty result is valid.
#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    async fn fetch(&self, start: i64, end: i64, query: &str) -> Result<Vec<Series>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_seconds() {
        assert_eq!(Point::new(1_672_531_200_999, None).timestamp_secs(), 1_672_531_200);
        assert_eq!(Point::new(-1, None).timestamp_secs(), -1);
    }

    #[test]
    fn test_series_from_pairs() {
        let s = Series::new("host:a", [(1000, Some(1.0)), (2000, None)]);
        assert_eq!(s.name, "host:a");
        assert_eq!(s.points, vec![Point::new(1000, Some(1.0)), Point::new(2000, None)]);
    }
}
