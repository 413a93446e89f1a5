// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by the datadog-csv crates.
//!
//! Usage:
//! - Set DATADOG_CSV_LOG=off (default) - no logs
//! - Set DATADOG_CSV_LOG=info - window queries and run summary
//! - Set DATADOG_CSV_LOG=debug - per-window series and row counts
//!
//! Logs always go to stderr. Stdout is reserved for CSV output.

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "DATADOG_CSV_LOG";

static INIT: Once = Once::new();

/// Parse a level name. `Ok(None)` means logging is switched off.
pub fn parse_level(name: &str) -> Result<Option<emit::Level>, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" | "" => Ok(None),
        "error" => Ok(Some(emit::Level::Error)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "info" => Ok(Some(emit::Level::Info)),
        "debug" => Ok(Some(emit::Level::Debug)),
        other => Err(format!(
            "unknown {LOG_ENV} value '{other}' (expected off, error, warn, info or debug)"
        )),
    }
}

/// Initialize diagnostics from the DATADOG_CSV_LOG environment variable.
///
/// `fallback` is used when the variable is unset. Only the first call has
/// any effect.
pub fn init_diagnostics(fallback: &str) {
    INIT.call_once(|| {
        let requested = std::env::var(LOG_ENV).unwrap_or_else(|_| fallback.to_string());

        let (level, complaint) = match parse_level(&requested) {
            Ok(level) => (level, None),
            Err(msg) => (Some(emit::Level::Info), Some(msg)),
        };

        let Some(level) = level else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if let Some(msg) = complaint {
            emit::warn!("{reason}, using info", reason: msg);
        }

        // The runtime must outlive every emitted event; it lives for the process.
        std::mem::forget(rt);
    });
}

/// Log normal progress (window queries, run summary).
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (per-window counts, skipped windows).
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log data-quality events that do not stop the run.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("off"), Ok(None));
        assert_eq!(parse_level(""), Ok(None));
        assert_eq!(parse_level("INFO"), Ok(Some(emit::Level::Info)));
        assert_eq!(parse_level(" debug "), Ok(Some(emit::Level::Debug)));
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_macros_log_properties() {
        init_diagnostics("info");
        init_diagnostics("debug");

        let window = "2023/01/01-00:00 to 2023/01/02-00:00".to_string();
        let rows: usize = 24;
        let column_index = 2;
        info!("Querying {window}", window: window);
        debug!("Window {window}: {rows} rows", window: window, rows: rows);
        warn!("Falling back to column {column_index}", column_index: column_index);
        error!("Failed to query {window}", window: window);
        info!("Plain message");
    }
}
