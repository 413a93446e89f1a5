// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result};

/// Write an example configuration file
#[allow(clippy::print_stdout)]
pub fn init_command(path: &Path) -> Result<()> {
    datadog::create_example_config(path)
        .with_context(|| format!("Failed to initialize {}", path.display()))?;

    println!("✓ Wrote example configuration to {}", path.display());
    println!("  Fill in api_key and app_key, or set DD_API_KEY and DD_APP_KEY");
    Ok(())
}
