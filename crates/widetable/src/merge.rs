// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Reshaping one window's series into wide rows.

use crate::columns::{ColumnMap, ColumnPolicy, Resolution};
use crate::error::{Error, Result};
use crate::series::Series;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// Output timestamp format: `yyyy/mm/dd-hh:mm:ss`.
pub const OUTPUT_FORMAT: &str = "%Y/%m/%d-%H:%M:%S";

/// How points from different series are lined up into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// The k-th point of every series shares row k. Timestamps are not
    /// compared; the backend is trusted to align samples within a window.
    #[default]
    Positional,
    /// One row per distinct point timestamp (to the second), ascending.
    Timestamp,
}

/// Time zone used when rendering row timestamps. Local time unless asked
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDisplay {
    Utc,
    #[default]
    Local,
}

/// One output row before rendering. `values[c - 1]` holds column `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub timestamp_secs: i64,
    pub values: Vec<Option<f64>>,
}

impl OutputRow {
    fn empty(timestamp_secs: i64, width: usize) -> Self {
        Self {
            timestamp_secs,
            values: vec![None; width],
        }
    }

    fn set(&mut self, column: usize, value: Option<f64>) {
        if let Some(cell) = column.checked_sub(1).and_then(|i| self.values.get_mut(i)) {
            *cell = value;
        }
    }

    /// Render as CSV fields: timestamp, then one field per series column.
    pub fn render(&self, display: TimeDisplay) -> Result<Vec<String>> {
        let mut fields = Vec::with_capacity(self.values.len() + 1);
        fields.push(format_timestamp(self.timestamp_secs, display)?);
        fields.extend(self.values.iter().map(|v| format_value(*v)));
        Ok(fields)
    }
}

pub fn format_timestamp(secs: i64, display: TimeDisplay) -> Result<String> {
    let utc = DateTime::from_timestamp(secs, 0).ok_or(Error::InvalidTimestamp { seconds: secs })?;
    Ok(match display {
        TimeDisplay::Utc => utc.format(OUTPUT_FORMAT).to_string(),
        TimeDisplay::Local => utc.with_timezone(&Local).format(OUTPUT_FORMAT).to_string(),
    })
}

/// Six decimal places, or empty for a missing value.
pub fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// Rows produced for one window plus what it took to place the series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedWindow {
    pub rows: Vec<OutputRow>,
    pub by_position: usize,
    pub dropped: usize,
}

/// Merge one window's series into rows shaped by `columns`.
pub fn merge(
    series: &[Series],
    columns: &ColumnMap,
    policy: ColumnPolicy,
    mode: MergeMode,
) -> Result<MergedWindow> {
    let mut merged = MergedWindow::default();
    let mut placed: Vec<(&Series, usize)> = Vec::with_capacity(series.len());

    for (position, s) in series.iter().enumerate() {
        match columns.resolve(&s.name, position, policy)? {
            Some(Resolution::ByName(column)) => placed.push((s, column)),
            Some(Resolution::ByPosition(column)) => {
                merged.by_position += 1;
                placed.push((s, column));
            }
            None => merged.dropped += 1,
        }
    }

    let width = columns.series_count();
    merged.rows = match mode {
        MergeMode::Positional => merge_positional(&placed, width),
        MergeMode::Timestamp => merge_by_timestamp(&placed, width),
    };
    Ok(merged)
}

fn merge_positional(placed: &[(&Series, usize)], width: usize) -> Vec<OutputRow> {
    let len = placed.iter().map(|(s, _)| s.points.len()).max().unwrap_or(0);
    let mut rows: Vec<Option<OutputRow>> = vec![None; len];

    for (s, column) in placed {
        for (i, point) in s.points.iter().enumerate() {
            rows[i]
                .get_or_insert_with(|| OutputRow::empty(point.timestamp_secs(), width))
                .set(*column, point.value);
        }
    }

    rows.into_iter().flatten().collect()
}

fn merge_by_timestamp(placed: &[(&Series, usize)], width: usize) -> Vec<OutputRow> {
    let mut rows: BTreeMap<i64, OutputRow> = BTreeMap::new();

    for (s, column) in placed {
        for point in &s.points {
            rows.entry(point.timestamp_secs())
                .or_insert_with(|| OutputRow::empty(point.timestamp_secs(), width))
                .set(*column, point.value);
        }
    }

    rows.into_values().collect()
}
