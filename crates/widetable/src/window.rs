// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use std::fmt;
use std::iter::FusedIterator;

/// Half-open query window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn start_secs(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_secs(&self) -> i64 {
        self.end.timestamp()
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Lazy sequence of contiguous windows stepping from a start toward `end`.
///
/// Iteration stops once a window would start at or after `end`. A
/// non-positive step yields nothing.
#[derive(Debug, Clone)]
pub struct Windows {
    next: DateTime<Utc>,
    end: DateTime<Utc>,
    step: TimeDelta,
}

impl Windows {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            next: start,
            end,
            step,
        }
    }

    fn remaining(&self) -> usize {
        let step = self.step.num_milliseconds();
        let left = (self.end - self.next).num_milliseconds();
        if step <= 0 || left <= 0 {
            return 0;
        }
        usize::try_from((left + step - 1) / step).unwrap_or(usize::MAX)
    }
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.step <= TimeDelta::zero() || self.next >= self.end {
            return None;
        }
        let window = Window {
            start: self.next,
            end: self.next + self.step,
        };
        self.next = window.end;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Windows {}

impl FusedIterator for Windows {}
