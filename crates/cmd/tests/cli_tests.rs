// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Runs the built binary for the commands that never reach the network.

use std::process::{Command, Output};

fn datadog_csv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_datadog-csv"))
        .args(args)
        .env_remove("DD_API_KEY")
        .env_remove("DD_APP_KEY")
        .env_remove("DATADOG_CSV_LOG")
        .output()
        .expect("failed to run datadog-csv")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_intervals_lists_catalog() {
    let output = datadog_csv(&["intervals"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let tokens: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(
        tokens,
        vec!["5m", "10m", "20m", "30m", "1h", "2h", "4h", "8h", "12h", "24h"]
    );
    assert!(stdout.contains("1h   sample every   60 min, query window  288 h (default)"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datadog-csv.yaml");
    let path_arg = path.to_str().unwrap();

    let first = datadog_csv(&["init", path_arg]);
    assert!(first.status.success(), "{}", stderr(&first));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("site: https://api.datadoghq.com"));

    let second = datadog_csv(&["init", path_arg]);
    assert!(!second.status.success());
    assert!(stderr(&second).contains("already exists"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
}

#[test]
fn test_unknown_interval_fails_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");

    let output = datadog_csv(&[
        "export",
        "--query",
        "avg:system.cpu.user{*}",
        "--start",
        "2023/01/01-00:00",
        "--end",
        "2023/01/02-00:00",
        "--interval",
        "15m",
        "--api-key",
        "a",
        "--app-key",
        "b",
        "--csv-file",
        out.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(
        err.contains("The interval value '15m' is not valid. Valid options are: 5m, 10m, 20m, 30m, 1h, 2h, 4h, 8h, 12h, 24h"),
        "{err}"
    );
    assert!(!out.exists());
}

#[test]
fn test_missing_keys_fail_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");

    let output = datadog_csv(&[
        "export",
        "-q",
        "avg:system.cpu.user{*}",
        "-s",
        "2023/01/01-00:00",
        "-e",
        "2023/01/02-00:00",
        "-o",
        out.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("DD_API_KEY"));
    assert!(!out.exists());
}

#[test]
fn test_bad_date_is_reported() {
    let output = datadog_csv(&[
        "export",
        "-q",
        "avg:system.cpu.user{*}",
        "-s",
        "2023-01-01 00:00",
        "-e",
        "2023/01/02-00:00",
        "--api-key",
        "a",
        "--app-key",
        "b",
    ]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("2023-01-01 00:00"));
}
