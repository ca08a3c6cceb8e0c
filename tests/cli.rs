mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn datamarket() -> Command {
    let mut cmd = Command::cargo_bin("datamarket").unwrap();
    cmd.env("LOG_JSON", "false").env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_help() {
    datamarket()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit").and(predicate::str::contains("campaigns")));
}

#[test]
fn test_missing_config() {
    datamarket()
        .arg("campaigns")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_campaigns_listing() {
    let config = common::config_file("http://127.0.0.1:9", "wallet:\n  mode: rpc");
    datamarket()
        .arg("--config")
        .arg(config.path())
        .arg("campaigns")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Image Classification Dataset")
                .and(predicate::str::contains("120 / 200 submissions (60%)")),
        );
}

#[test]
fn test_campaigns_json() {
    let config = common::config_file("http://127.0.0.1:9", "wallet:\n  mode: rpc");
    let output = datamarket()
        .arg("--config")
        .arg(config.path())
        .args(["campaigns", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 3);
    assert_eq!(listing[2]["category"], "audio");
}

#[test]
fn test_deployment_params() {
    let config = common::config_file("http://127.0.0.1:9", "wallet:\n  mode: rpc");
    datamarket()
        .arg("--config")
        .arg(config.path())
        .arg("deployment-params")
        .assert()
        .success()
        .stdout(predicate::str::contains("DataMarketplaceModule").and(predicate::str::contains(
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
        )));
}

#[test]
fn test_submit_without_node_fails_cleanly() {
    let config = common::config_file("http://127.0.0.1:9", "wallet:\n  mode: rpc");
    datamarket()
        .arg("--config")
        .arg(config.path())
        .args(["submit", "--description", "Test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wallet unavailable"));
}

#[test]
fn test_campaigns_open_on_filters_by_deadline() {
    let config = common::config_file("http://127.0.0.1:9", "wallet:\n  mode: rpc");
    datamarket()
        .arg("--config")
        .arg(config.path())
        .args(["campaigns", "--open-on", "2025-03-21"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Voice Command Dataset")
                .and(predicate::str::contains("Text Sentiment Analysis").not()),
        );
}
