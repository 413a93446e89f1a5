// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Snapping a requested date range onto whole query windows.

use crate::error::{Error, Result};
use crate::interval::IntervalSpec;
use crate::window::Windows;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// Input format for range bounds: `yyyy/mm/dd-hh:mm`.
pub const INPUT_FORMAT: &str = "%Y/%m/%d-%H:%M";

/// Parse a range bound given as `yyyy/mm/dd-hh:mm`, interpreted as UTC.
///
/// `which` names the bound ("start" or "end") in the error message.
pub fn parse_input_time(which: &'static str, input: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input.trim(), INPUT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| Error::InvalidDate {
            which,
            input: input.to_string(),
            source,
        })
}

pub fn format_input_time(t: DateTime<Utc>) -> String {
    t.format(INPUT_FORMAT).to_string()
}

/// Widen `start` leftward so `end - start` is a whole number of windows.
///
/// Returns `end - ceil((end - start) / window) * window`. The end never
/// moves and the result is never later than `start`.
pub fn normalize(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window: TimeDelta,
) -> Result<DateTime<Utc>> {
    let w = window.num_milliseconds();
    if w <= 0 {
        return Err(Error::InvalidWindow { millis: w });
    }
    if start > end {
        return Err(Error::InvalidRange {
            start: format_input_time(start),
            end: format_input_time(end),
        });
    }

    let raw = (end - start).num_milliseconds();
    let multiples = (raw + w - 1) / w;
    if multiples == 0 {
        return Err(Error::EmptyRange {
            start: format_input_time(start),
            end: format_input_time(end),
        });
    }

    Ok(end - TimeDelta::milliseconds(multiples * w))
}

/// A normalized range together with the window span that tiles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    requested_start: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window: TimeDelta,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, window: TimeDelta) -> Result<Self> {
        let snapped = normalize(start, end, window)?;
        Ok(Self {
            requested_start: start,
            start: snapped,
            end,
            window,
        })
    }

    pub fn for_interval(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &IntervalSpec,
    ) -> Result<Self> {
        Self::new(start, end, interval.query_window())
    }

    /// Snapped start; at or before the requested start.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn requested_start(&self) -> DateTime<Utc> {
        self.requested_start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    pub fn window_count(&self) -> usize {
        self.windows().len()
    }

    /// A fresh iterator over the windows; each call starts over.
    pub fn windows(&self) -> Windows {
        Windows::new(self.start, self.end, self.window)
    }
}
