/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use common::{ZeekLogBuilder, conn_log};
use predicates::prelude::*;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zeek-log-parser"))
}

#[test]
fn test_cli_json_writes_file_next_to_log() {
    let dir = TempDir::new().unwrap();
    let log = conn_log().write_to(dir.path(), "conn.log");

    bin().arg("json").arg(&log).assert().success().stdout(predicate::str::contains("(3 records)"));

    let json = fs::read_to_string(dir.path().join("conn.json")).unwrap();
    let lines: Vec<&str> = json.lines().collect();
    assert_eq!(lines.len(), 3);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["id.resp_p"], serde_json::json!(443));
}

#[test]
fn test_cli_json_expands_directories() {
    let dir = TempDir::new().unwrap();
    conn_log().write_to(dir.path(), "conn.log");
    ZeekLogBuilder::new()
        .path("dns")
        .field("ts", "time")
        .field("query", "string")
        .row(&["1.0", "example.com"])
        .write_to(dir.path(), "dns.log");
    fs::write(dir.path().join("README.txt"), "not a log").unwrap();

    bin().arg("json").arg(dir.path()).assert().success();

    assert!(dir.path().join("conn.json").exists());
    assert!(dir.path().join("dns.json").exists());
    assert!(!dir.path().join("README.json").exists());
}

#[test]
fn test_cli_json_stdout_with_filter_and_meta() {
    let log = conn_log().temp_file();

    bin()
        .args(["json", "--stdout", "--fields", "uid,id.resp_p", "--meta", "sensor=edge-1"])
        .arg(log.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"uid":"CHhAvVGS1DHFjwGM9","id.resp_p":443,"sensor":"edge-1"}"#,
        ));
}

#[test]
fn test_cli_csv_output() {
    let log = ZeekLogBuilder::new()
        .field("ts", "time")
        .field("id.orig_h", "addr")
        .field("id.resp_p", "port")
        .row(&["1500000000.0", "10.0.0.1", "-"])
        .temp_file();

    bin()
        .args(["csv", "--fields", "ts,id.orig_h"])
        .arg(log.path())
        .assert()
        .success()
        .stdout(predicate::eq("ts,id.orig_h\n\"1500000000.0\",\"10.0.0.1\"\n"));
}

#[test]
fn test_cli_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let log = conn_log().write_to(dir.path(), "conn.log");
    let out = dir.path().join("out.csv");

    bin().arg("csv").arg(&log).arg("-o").arg(&out).assert().success();

    let csv = fs::read_to_string(out).unwrap();
    assert!(csv.starts_with("ts,uid,id.orig_h,"));
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn test_cli_fields() {
    let log = conn_log().temp_file();

    bin()
        .args(["fields", "--csv", "--ignore", "uid"])
        .arg(log.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ts,id.orig_h,id.orig_p,"));

    bin()
        .args(["fields", "--fields", "ts,proto"])
        .arg(log.path())
        .assert()
        .success()
        .stdout(predicate::eq("ts\nproto\n"));
}

#[test]
fn test_cli_bulk_output() {
    let log = conn_log().temp_file();

    bin()
        .args(["bulk", "--index", "conn", "--batch-size", "2"])
        .arg(log.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"index":{"_index":"conn"}}"#))
        .stderr(predicate::str::contains("Exported 3 documents in 2 batches"));
}

#[test]
fn test_cli_malformed_header_fails() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.log");
    fs::write(&bad, "#fields\tts\n1.0\n").unwrap();

    bin()
        .arg("csv")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed header"));
}

#[test]
fn test_cli_json_reports_failed_files() {
    let dir = TempDir::new().unwrap();
    conn_log().write_to(dir.path(), "conn.log");
    fs::write(dir.path().join("broken.log"), "not a zeek log\n").unwrap();

    bin()
        .arg("json")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 files failed"));

    assert!(dir.path().join("conn.json").exists());
}

#[test]
fn test_cli_missing_input() {
    bin().args(["json", "/nonexistent/conn.log"]).assert().failure().stderr(predicate::str::contains("Input not found"));
}

#[test]
fn test_cli_no_command_shows_help_message() {
    bin().assert().success().stdout(predicate::str::contains("Use --help for usage information"));
}

#[test]
fn test_cli_help_flag() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert Zeek (Bro) ASCII logs"))
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("bulk"));
}

#[test]
fn test_cli_version_flag() {
    bin().arg("--version").assert().success().stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_invalid_meta() {
    let log = conn_log().temp_file();
    bin().args(["json", "--stdout", "--meta", "novalue"]).arg(log.path()).assert().failure();
}
