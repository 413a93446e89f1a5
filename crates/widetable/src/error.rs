// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for windowed export runs

use thiserror::Error;

/// Error returned by a [`crate::SeriesFetcher`] implementation.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The interval value '{token}' is not valid. Valid options are: {valid}")]
    UnknownInterval { token: String, valid: String },

    #[error("Unable to parse '{which}' date '{input}'. Expected format is: yyyy/mm/dd-hh:mm")]
    InvalidDate {
        which: &'static str,
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Query window must be at least one millisecond, got {millis} ms")]
    InvalidWindow { millis: i64 },

    #[error("Empty range: {start} to {end} covers no query windows")]
    EmptyRange { start: String, end: String },

    #[error("Series '{name}' at position {position} does not match any established column")]
    UnmatchedSeries { name: String, position: usize },

    #[error("Failed to query metrics for window {start} to {end}")]
    Fetch {
        start: String,
        end: String,
        #[source]
        source: FetchError,
    },

    #[error("Header row was already written")]
    HeaderAlreadyWritten,

    #[error("Data rows written before the header row")]
    HeaderNotWritten,

    #[error("Timestamp {seconds} is outside the representable date range")]
    InvalidTimestamp { seconds: i64 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
