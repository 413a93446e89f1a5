// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, ValueEnum};
use datadog::DatadogConfig;
use diagnostics::*;
use widetable::{
    ColumnPolicy, CsvSink, ExportOptions, ExportSummary, IntervalCatalog, MergeMode,
    SeriesFetcher, TimeDisplay, TimeRange, parse_input_time,
};

use crate::common::{ApiArgs, Connection, load_config_or_default, process_env};

/// How rows of one window are lined up
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MergeArg {
    /// Row i holds the i-th point of every series
    Positional,
    /// One row per distinct point timestamp
    Timestamp,
}

impl From<MergeArg> for MergeMode {
    fn from(arg: MergeArg) -> Self {
        match arg {
            MergeArg::Positional => MergeMode::Positional,
            MergeArg::Timestamp => MergeMode::Timestamp,
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Metric query, e.g. "avg:system.cpu.user{*} by {host}"
    #[arg(short, long)]
    pub query: Option<String>,
    /// Start of the range, yyyy/mm/dd-hh:mm (UTC)
    #[arg(short, long)]
    pub start: String,
    /// End of the range, yyyy/mm/dd-hh:mm (UTC)
    #[arg(short, long)]
    pub end: String,
    /// Sample interval token; see `datadog-csv intervals` [default: 1h]
    #[arg(short, long)]
    pub interval: Option<String>,
    /// Output file, replaced if it exists [default: stdout]
    #[arg(short = 'o', long)]
    pub csv_file: Option<PathBuf>,
    #[command(flatten)]
    pub api: ApiArgs,
    /// Fail instead of placing an unknown series by position
    #[arg(long)]
    pub strict_columns: bool,
    /// Row alignment within a window
    #[arg(long, value_enum, default_value_t = MergeArg::Positional)]
    pub merge: MergeArg,
    /// Write row timestamps in UTC instead of local time
    #[arg(long)]
    pub utc: bool,
}

/// Everything an export needs, settled before any request or file is made.
#[derive(Debug)]
pub struct ExportPlan {
    pub range: TimeRange,
    pub options: ExportOptions,
    pub csv_file: Option<PathBuf>,
    pub connection: Connection,
}

pub fn plan_export<E>(args: &ExportArgs, config: &DatadogConfig, env: E) -> Result<ExportPlan>
where
    E: Fn(&str) -> Option<String>,
{
    let token = args
        .interval
        .as_deref()
        .or(config.interval.as_deref())
        .unwrap_or(widetable::DEFAULT_INTERVAL);
    let spec = IntervalCatalog::standard().lookup(token)?;

    let start = parse_input_time("start", &args.start)?;
    let end = parse_input_time("end", &args.end)?;
    let range = TimeRange::for_interval(start, end, spec)?;

    let query = args
        .query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .or(config.query.as_deref())
        .ok_or_else(|| anyhow!("No query given: pass --query or set query in the config file"))?;

    let connection = args.api.resolve_with(config, env)?;

    let options = ExportOptions {
        query: query.to_string(),
        policy: if args.strict_columns {
            ColumnPolicy::Strict
        } else {
            ColumnPolicy::Fallback
        },
        mode: args.merge.into(),
        display: if args.utc {
            TimeDisplay::Utc
        } else {
            TimeDisplay::Local
        },
    };

    Ok(ExportPlan {
        range,
        options,
        csv_file: args
            .csv_file
            .clone()
            .or_else(|| config.csv_file.as_ref().map(PathBuf::from)),
        connection,
    })
}

/// Export the query to CSV, window by window
pub async fn export_command(config_path: Option<&Path>, args: &ExportArgs) -> Result<()> {
    let config = load_config_or_default(config_path)?;
    let plan = plan_export(args, &config, process_env)?;
    let client = plan.connection.client()?;

    match &plan.csv_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let summary = write_csv(&plan, &client, BufWriter::new(file)).await?;
            let path = path.display().to_string();
            let rows = summary.rows;
            info!("Wrote {rows} rows to {path}", rows: rows, path: path);
        }
        None => {
            write_csv(&plan, &client, std::io::stdout()).await?;
        }
    }
    Ok(())
}

async fn write_csv<F, W>(plan: &ExportPlan, fetcher: &F, out: W) -> Result<ExportSummary>
where
    F: SeriesFetcher + ?Sized,
    W: Write,
{
    let mut sink = CsvSink::new(out);
    let summary = widetable::export(&plan.range, fetcher, &mut sink, &plan.options).await?;
    let mut out = sink.into_inner()?;
    out.flush().with_context(|| "Failed to flush CSV output")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use widetable::{FetchError, Series};

    fn args(start: &str, end: &str) -> ExportArgs {
        ExportArgs {
            query: Some("avg:system.load.1{*} by {host}".to_string()),
            start: start.to_string(),
            end: end.to_string(),
            interval: None,
            csv_file: None,
            api: ApiArgs {
                api_key: Some("api".to_string()),
                app_key: Some("app".to_string()),
                site: None,
            },
            strict_columns: false,
            merge: MergeArg::Positional,
            utc: true,
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_plan_defaults() {
        let plan = plan_export(
            &args("2023/01/01-00:00", "2023/01/02-00:00"),
            &DatadogConfig::default(),
            no_env,
        )
        .unwrap();

        // 1h samples over 288h windows: one window ending at the requested end
        assert_eq!(plan.range.window_count(), 1);
        assert_eq!(plan.range.end().timestamp(), 1672617600);
        assert_eq!(plan.range.start().timestamp(), 1672617600 - 288 * 3600);
        assert_eq!(plan.options.policy, ColumnPolicy::Fallback);
        assert_eq!(plan.options.mode, MergeMode::Positional);
        assert_eq!(plan.options.display, TimeDisplay::Utc);
        assert_eq!(plan.connection.site, datadog::DEFAULT_SITE);
        assert!(plan.csv_file.is_none());
    }

    #[test]
    fn test_plan_takes_defaults_from_config() {
        let config = DatadogConfig {
            query: Some("sum:requests{*}".to_string()),
            interval: Some("5m".to_string()),
            csv_file: Some("out.csv".to_string()),
            ..Default::default()
        };
        let mut a = args("2023/01/01-00:00", "2023/01/03-00:00");
        a.query = None;

        let plan = plan_export(&a, &config, no_env).unwrap();
        assert_eq!(plan.options.query, "sum:requests{*}");
        assert_eq!(plan.range.window_count(), 2);
        assert_eq!(plan.csv_file, Some(PathBuf::from("out.csv")));

        a.interval = Some("10m".to_string());
        a.strict_columns = true;
        a.utc = false;
        a.merge = MergeArg::Timestamp;
        let plan = plan_export(&a, &config, no_env).unwrap();
        assert_eq!(plan.range.window_count(), 1);
        assert_eq!(plan.options.policy, ColumnPolicy::Strict);
        assert_eq!(plan.options.mode, MergeMode::Timestamp);
        assert_eq!(plan.options.display, TimeDisplay::Local);
    }

    #[test]
    fn test_configuration_errors() {
        let config = DatadogConfig::default();

        let mut bad_interval = args("2023/01/01-00:00", "2023/01/02-00:00");
        bad_interval.interval = Some("15m".to_string());
        let err = plan_export(&bad_interval, &config, no_env).unwrap_err();
        assert!(err.to_string().contains("'15m' is not valid"));

        let bad_date = args("2023-01-01", "2023/01/02-00:00");
        assert!(plan_export(&bad_date, &config, no_env).is_err());

        let reversed = args("2023/01/02-00:00", "2023/01/01-00:00");
        assert!(plan_export(&reversed, &config, no_env).is_err());

        let mut no_query = args("2023/01/01-00:00", "2023/01/02-00:00");
        no_query.query = Some(" ".to_string());
        let err = plan_export(&no_query, &config, no_env).unwrap_err();
        assert!(err.to_string().contains("No query"));

        let mut no_keys = args("2023/01/01-00:00", "2023/01/02-00:00");
        no_keys.api = ApiArgs::default();
        let err = plan_export(&no_keys, &config, no_env).unwrap_err();
        assert!(err.to_string().contains(datadog::API_KEY_ENV));
    }

    #[tokio::test]
    async fn test_write_csv_to_buffer() {
        let plan = plan_export(
            &args("2023/01/01-00:00", "2023/01/02-00:00"),
            &DatadogConfig::default(),
            no_env,
        )
        .unwrap();

        let mut out = Vec::new();
        let summary = write_csv(&plan, &Fixed, &mut out).await.unwrap();
        assert_eq!(summary.rows, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,host:a\n2023/01/01-00:00:00,1.500000\n"
        );
    }

    struct Fixed;

    #[async_trait]
    impl SeriesFetcher for Fixed {
        async fn fetch(
            &self,
            _start: i64,
            _end: i64,
            _query: &str,
        ) -> Result<Vec<Series>, FetchError> {
            Ok(vec![Series::new("host:a", [(1672531200000, Some(1.5))])])
        }
    }
}
