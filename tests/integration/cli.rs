//! Integration tests for the command line binary

use super::mock_server::{MockApi, MockServer, TEST_TOKEN};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn command() -> Command {
    let mut cmd = Command::cargo_bin("datawrapper-export").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("LOG_FORMAT")
        .env_remove("DATAWRAPPER_API_BASE");
    cmd
}

#[test]
fn test_missing_token_fails_before_any_request() {
    command()
        .env_remove("DATAWRAPPER_API_TOKEN")
        .args(["list", "--folder-id", "1", "--api-base-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "DATAWRAPPER_API_TOKEN environment variable not set",
        ));
}

#[test]
fn test_missing_token_reported_before_numbering_file() {
    command()
        .env_remove("DATAWRAPPER_API_TOKEN")
        .args([
            "export",
            "--folder-id",
            "1",
            "--numbering",
            "/nonexistent/chart_numbering.xlsx",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "DATAWRAPPER_API_TOKEN environment variable not set",
        ))
        .stderr(predicate::str::contains("numbering error").not());
}

#[test]
fn test_blank_token_fails() {
    command()
        .env("DATAWRAPPER_API_TOKEN", "   ")
        .args(["export", "--folder-id", "1"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_max_retries_out_of_range() {
    command()
        .env("DATAWRAPPER_API_TOKEN", TEST_TOKEN)
        .args(["--max-retries", "0", "export", "--folder-id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-retries"));
}

#[test]
fn test_invalid_base_url() {
    command()
        .env("DATAWRAPPER_API_TOKEN", TEST_TOKEN)
        .args(["export", "--folder-id", "1", "--api-base-url", "ftp://example.com"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid API base URL"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_export_command_end_to_end() {
    let api = MockApi::new()
        .folder(
            1,
            json!({"id": 1, "name": "X", "charts": [{"id": "c1"}], "children": [{"id": 2}]}),
        )
        .folder(2, json!({"id": 2, "name": "Sub", "charts": [{"id": "c3"}]}))
        .chart("c1", json!({"id": "c1", "title": "Alpha", "publicVersion": 1}))
        .chart("c3", json!({"id": "c3", "title": "Gamma", "publicVersion": 1}));
    let server = MockServer::start(api).await;
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().to_path_buf();
    let base_url = server.base_url();

    let output = tokio::task::spawn_blocking(move || {
        command()
            .env("DATAWRAPPER_API_TOKEN", TEST_TOKEN)
            .args([
                "--output-format",
                "json",
                "--base-wait-secs",
                "0",
                "--api-base-url",
                base_url.as_str(),
                "export",
                "--folder-id",
                "1",
                "--recursive",
                "--format",
                "svg:plain",
                "--out",
            ])
            .arg(&out)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    })
    .await
    .unwrap();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["success"], true);
    assert_eq!(summary["exported"], 2);
    assert!(temp_dir.path().join("c1-Alpha.svg").exists());
    assert!(temp_dir.path().join("Sub").join("c3-Gamma.svg").exists());
}
