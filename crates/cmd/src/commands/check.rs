// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result};
use diagnostics::*;

use crate::common::{ApiArgs, load_config_or_default, process_env};

/// Ask Datadog whether the API key is accepted
#[allow(clippy::print_stdout)]
pub async fn check_command(config_path: Option<&Path>, api: &ApiArgs) -> Result<()> {
    let config = load_config_or_default(config_path)?;
    let connection = api.resolve_with(&config, process_env)?;
    let client = connection.client()?;

    let site = connection.site.clone();
    info!("Validating API key against {site}", site: site);
    client
        .validate_keys()
        .await
        .with_context(|| format!("Key check against {} failed", connection.site))?;

    println!("✓ API key accepted by {}", connection.site);
    Ok(())
}
