// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Windowed metric export into a wide, one-column-per-series table.
//!
//! A requested date range is snapped onto whole query windows sized from an
//! interval token, each window is fetched through a [`SeriesFetcher`], and
//! the per-series points are merged into rows under a header fixed by the
//! first window with data.

pub mod columns;
pub mod error;
pub mod export;
pub mod interval;
pub mod merge;
pub mod range;
pub mod series;
pub mod sink;
pub mod window;

pub use crate::columns::{ColumnMap, ColumnPolicy, DATE_COLUMN, Resolution};
pub use crate::error::{Error, FetchError, Result};
pub use crate::export::{ExportOptions, ExportSummary, export};
pub use crate::interval::{DEFAULT_INTERVAL, IntervalCatalog, IntervalSpec};
pub use crate::merge::{MergeMode, MergedWindow, OutputRow, TimeDisplay, merge};
pub use crate::range::{TimeRange, normalize, parse_input_time};
pub use crate::series::{Point, Series, SeriesFetcher};
pub use crate::sink::{CsvSink, TableSink};
pub use crate::window::{Window, Windows};
