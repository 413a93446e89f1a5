// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Window-by-window export loop.
//!
//! Each window is fetched, merged and written before the next is fetched, and
//! the sink is flushed after every window. A failed fetch ends the run with
//! the rows of all completed windows already written.

use crate::columns::{ColumnMap, ColumnPolicy};
use crate::error::{Error, Result};
use crate::merge::{MergeMode, TimeDisplay, merge};
use crate::range::{TimeRange, format_input_time};
use crate::series::SeriesFetcher;
use crate::sink::TableSink;
use diagnostics::*;

/// Settings for one export run.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub query: String,
    pub policy: ColumnPolicy,
    pub mode: MergeMode,
    pub display: TimeDisplay,
}

impl ExportOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// What an export run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub windows: usize,
    pub empty_windows: usize,
    pub rows: usize,
    pub by_position: usize,
    pub dropped: usize,
    /// Header row, empty if no window returned any series.
    pub header: Vec<String>,
}

/// Fetch every window of `range` in order and write the merged rows.
///
/// The header comes from the first window that returns series and is written
/// exactly once, before its rows.
pub async fn export<F, S>(
    range: &TimeRange,
    fetcher: &F,
    sink: &mut S,
    options: &ExportOptions,
) -> Result<ExportSummary>
where
    F: SeriesFetcher + ?Sized,
    S: TableSink + ?Sized,
{
    let mut summary = ExportSummary::default();
    let mut columns: Option<ColumnMap> = None;

    let requested = format!(
        "{} to {}",
        format_input_time(range.requested_start()),
        format_input_time(range.end())
    );
    let querying = format!(
        "{} to {}",
        format_input_time(range.start()),
        format_input_time(range.end())
    );
    let window_count = range.window_count();
    info!("Requested date range: {requested}", requested: requested);
    info!(
        "Querying date range: {querying} ({window_count} windows)",
        querying: querying,
        window_count: window_count
    );

    for window in range.windows() {
        let query = options.query.as_str();
        let bounds = format!(
            "'{}' to '{}'",
            format_input_time(window.start),
            format_input_time(window.end)
        );
        info!("Querying '{query}' from {bounds}", query: query, bounds: bounds);

        let series = fetcher
            .fetch(window.start_secs(), window.end_secs(), query)
            .await
            .map_err(|source| Error::Fetch {
                start: format_input_time(window.start),
                end: format_input_time(window.end),
                source,
            })?;
        summary.windows += 1;

        if series.is_empty() {
            debug!("No series returned for {bounds}", bounds: bounds);
            summary.empty_windows += 1;
            continue;
        }

        if columns.is_none() {
            let established = ColumnMap::establish(series.iter().map(|s| s.name.as_str()));
            let header = established.header();
            sink.write_header(&header)?;
            let series_count = established.series_count();
            debug!("Established {series_count} series columns", series_count: series_count);
            summary.header = header;
            columns = Some(established);
        }
        let columns = columns.as_ref().ok_or(Error::HeaderNotWritten)?;

        let merged = merge(&series, columns, options.policy, options.mode)?;
        let rows = merged
            .rows
            .iter()
            .map(|row| row.render(options.display))
            .collect::<Result<Vec<_>>>()?;

        sink.write_rows(&rows)?;
        sink.flush()?;

        let series_count = series.len();
        let row_count = rows.len();
        debug!(
            "Window {bounds}: {series_count} series, {row_count} rows",
            bounds: bounds,
            series_count: series_count,
            row_count: row_count
        );

        summary.rows += row_count;
        summary.by_position += merged.by_position;
        summary.dropped += merged.dropped;
    }

    if summary.header.is_empty() {
        warn!("No series returned for {querying}; nothing was written", querying: querying);
    }

    let windows = summary.windows;
    let rows = summary.rows;
    let by_position = summary.by_position;
    let dropped = summary.dropped;
    info!(
        "Export finished: {windows} windows, {rows} rows, {by_position} positional fallbacks, {dropped} dropped series",
        windows: windows,
        rows: rows,
        by_position: by_position,
        dropped: dropped
    );

    Ok(summary)
}
