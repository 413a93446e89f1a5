// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Stable series-name to column mapping across query windows.
//!
//! The header is fixed by the first window that returns series. Later
//! windows are matched by exact name first; a series whose name is not in
//! the header is placed by its position in the fetch result instead. That
//! fallback can put values under the wrong header when the backend drops or
//! reorders series, so it is logged, and `ColumnPolicy::Strict` refuses it.

use crate::error::{Error, Result};
use diagnostics::*;
use std::collections::HashMap;

/// Header of the timestamp column.
pub const DATE_COLUMN: &str = "date";

/// How unmatched series names are handled in windows after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnPolicy {
    /// By name, then by fetch position.
    #[default]
    Fallback,
    /// By name only; an unmatched name fails the run.
    Strict,
}

/// Which strategy placed a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    ByName(usize),
    ByPosition(usize),
}

impl Resolution {
    /// Output column index (0 is the date column).
    pub fn column(&self) -> usize {
        match *self {
            Resolution::ByName(c) | Resolution::ByPosition(c) => c,
        }
    }
}

/// Column assignment established from the first window with data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColumnMap {
    /// Assign columns `1..=N` in fetch order. With duplicate names the first
    /// occurrence owns the name.
    pub fn establish<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i + 1);
        }
        Self { names, index }
    }

    /// Number of series columns, excluding the date column.
    pub fn series_count(&self) -> usize {
        self.names.len()
    }

    /// Full header row: `date` followed by the series names.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(DATE_COLUMN.to_string())
            .chain(self.names.iter().cloned())
            .collect()
    }

    pub fn by_name(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Column for the series at fetch position `position`, if the header is
    /// wide enough to hold it.
    pub fn by_position(&self, position: usize) -> Option<usize> {
        (position < self.names.len()).then_some(position + 1)
    }

    /// Resolve a series to a column under `policy`.
    ///
    /// `Ok(None)` means the series could not be placed and is skipped.
    pub fn resolve(
        &self,
        name: &str,
        position: usize,
        policy: ColumnPolicy,
    ) -> Result<Option<Resolution>> {
        if let Some(column) = self.by_name(name) {
            return Ok(Some(Resolution::ByName(column)));
        }

        if policy == ColumnPolicy::Strict {
            return Err(Error::UnmatchedSeries {
                name: name.to_string(),
                position,
            });
        }

        match self.by_position(position) {
            Some(column) => {
                warn!(
                    "Falling back to index order for scope: {name} (position {position} -> column {column_index})",
                    name: name,
                    position: position,
                    column_index: column
                );
                Ok(Some(Resolution::ByPosition(column)))
            }
            None => {
                let width = self.names.len();
                warn!(
                    "Dropping scope {name}: position {position} is beyond the {width} established columns",
                    name: name,
                    position: position,
                    width: width
                );
                Ok(None)
            }
        }
    }
}
