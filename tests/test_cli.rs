#[cfg(test)]
extern crate assert_cmd;
extern crate predicates;

use assert_cmd::prelude::*;
use predicates::prelude::*;

use std::process::Command;

#[test]
fn test_cli() {
    let mut cmd = Command::cargo_bin("s3-browser").expect("Calling binary failed");
    cmd.assert().failure();
}

#[test]
fn test_version() {
    let expected_version = "s3-browser 0.3.0\n";
    let mut cmd = Command::cargo_bin("s3-browser").expect("Calling binary failed");
    cmd.arg("--version").assert().stdout(expected_version);
}

#[test]
fn test_meta_prints_parsed_endpoint() {
    let mut cmd = Command::cargo_bin("s3-browser").expect("Calling binary failed");
    let output = cmd
        .args([
            "meta",
            "--endpoint",
            "s3://user:pass@minio.local:9100/ignored?x=1",
            "--access-key",
            "ak",
            "--secret-key",
            "sk",
            "--bucket",
            "reports",
        ])
        .output()
        .expect("Running meta failed");

    assert!(output.status.success());
    let meta: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(meta["endpoint_url"], "http://minio.local:9100");
    assert_eq!(meta["aws_access_key_id"], "ak");
    assert_eq!(meta["aws_secret_access_key"], "sk");
    assert_eq!(meta["bucket"], "reports");
}

#[test]
fn test_meta_uses_default_config() {
    let mut cmd = Command::cargo_bin("s3-browser").expect("Calling binary failed");
    cmd.arg("meta")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9000"))
        .stdout(predicate::str::contains("my-bucket"));
}

#[test]
fn test_meta_rejects_malformed_endpoint() {
    let mut cmd = Command::cargo_bin("s3-browser").expect("Calling binary failed");
    cmd.args(["meta", "--endpoint", "host:"]).assert().failure();
}

#[test]
fn test_profiles_disabled_prints_empty_list() {
    let mut cmd = Command::cargo_bin("s3-browser").expect("Calling binary failed");
    cmd.arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn test_meta_host_and_port_flags() {
    let mut cmd = Command::cargo_bin("s3-browser").expect("Calling binary failed");
    let output = cmd
        .args(["meta", "--host", "10.0.0.9", "--port", "9001"])
        .output()
        .expect("Running meta failed");

    assert!(output.status.success());
    let meta: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(meta["endpoint_url"], "http://10.0.0.9:9001");
}
