// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use widetable::{IntervalCatalog, IntervalSpec};

/// One line of the catalog listing
fn describe(spec: &IntervalSpec) -> String {
    format!(
        "{:<4} sample every {:>4} min, query window {:>4} h",
        spec.token(),
        spec.sample_interval().num_minutes(),
        spec.query_window().num_hours()
    )
}

/// Print the interval catalog
#[allow(clippy::print_stdout)]
pub fn intervals_command() -> Result<()> {
    for spec in IntervalCatalog::standard().iter() {
        let line = describe(spec);
        if spec.token() == widetable::DEFAULT_INTERVAL {
            println!("{line} (default)");
        } else {
            println!("{line}");
        }
    }
    Ok(())
}
