// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod client;
pub mod config;
pub mod models;

// Re-export key types for use in tests and external applications
pub use crate::client::Client;
pub use crate::config::{
    API_KEY_ENV, APP_KEY_ENV, Credentials, create_example_config, load_config, validate_config,
};
pub use crate::models::{DEFAULT_SITE, DatadogConfig, QueryResponse, SeriesData};
