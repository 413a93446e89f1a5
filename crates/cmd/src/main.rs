// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(author, version, about = "Export Datadog metrics to a wide CSV table", long_about = None)]
#[command(name = "datadog-csv")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log progress to stderr (same as DATADOG_CSV_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// YAML configuration file with keys, site and defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a metric query over a time range as CSV, one window at a time
    Export(commands::ExportArgs),
    /// Write an example configuration file
    Init {
        /// Where to write the file
        #[arg(default_value = common::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
    /// List the supported interval tokens and their query windows
    Intervals,
    /// Check that Datadog accepts the API key
    Check {
        #[command(flatten)]
        api: common::ApiArgs,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    diagnostics::init_diagnostics(if cli.verbose { "info" } else { "off" });

    match &cli.command {
        Commands::Export(args) => commands::export_command(cli.config.as_deref(), args).await,
        Commands::Init { path } => commands::init_command(path),
        Commands::Intervals => commands::intervals_command(),
        Commands::Check { api } => commands::check_command(cli.config.as_deref(), api).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from([
            "datadog-csv",
            "export",
            "-q",
            "avg:system.cpu.user{*} by {host}",
            "-s",
            "2023/01/01-00:00",
            "-e",
            "2023/01/02-00:00",
            "-i",
            "5m",
            "--merge",
            "timestamp",
            "--strict-columns",
            "--config",
            "dd.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("dd.yaml")));
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.interval.as_deref(), Some("5m"));
        assert_eq!(args.merge, commands::MergeArg::Timestamp);
        assert!(args.strict_columns);
        assert!(!args.utc);
    }

    #[test]
    fn test_utc_flag() {
        let cli = Cli::try_parse_from([
            "datadog-csv", "export", "-q", "q", "-s", "2023/01/01-00:00", "-e",
            "2023/01/02-00:00", "--utc",
        ])
        .unwrap();
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert!(args.utc);
        assert!(
            Cli::try_parse_from([
                "datadog-csv", "export", "-q", "q", "-s", "2023/01/01-00:00", "-e",
                "2023/01/02-00:00", "--local-time",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_init_default_path() {
        let cli = Cli::try_parse_from(["datadog-csv", "init"]).unwrap();
        let Commands::Init { path } = cli.command else {
            panic!("expected init");
        };
        assert_eq!(path, PathBuf::from(common::DEFAULT_CONFIG_FILE));
    }
}
