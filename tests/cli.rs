//! Binary-level tests for the `logimas` CLI.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn logimas() -> Command {
    let mut cmd = Command::cargo_bin("logimas").unwrap();
    cmd.env_remove("LOGIMAS_DB_PATH")
        .env_remove("OPENAI_API_KEY")
        .env_remove("LOGIMAS_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn init_db(dir: &TempDir) -> std::path::PathBuf {
    let db = dir.path().join("ops.db");
    logimas()
        .arg("--db-path")
        .arg(&db)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized LogiMAS database"));
    db
}

#[test]
fn test_help_lists_commands() {
    logimas()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("route"))
        .stdout(predicate::str::contains("tools"));
}

#[test]
fn test_init_twice_requires_force() {
    let dir = TempDir::new().unwrap();
    let db = init_db(&dir);
    logimas()
        .arg("--db-path")
        .arg(&db)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    logimas()
        .arg("--db-path")
        .arg(&db)
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_tools_list_json() {
    logimas()
        .args(["--format", "json", "tools", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"shipment-status-lookup\""))
        .stdout(predicate::str::contains("\"route-fuel-cost-calculator\""))
        .stdout(predicate::str::contains("\"batching-analysis\""))
        .stdout(predicate::str::contains("\"item_volumes\""));
}

#[test]
fn test_tools_call_returns_error_payload() {
    let dir = TempDir::new().unwrap();
    let db = init_db(&dir);
    logimas()
        .arg("--db-path")
        .arg(&db)
        .args(["tools", "call", "shipment-status-lookup", r#"{"shipment_id":"SHP-404"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"error":"Shipment not found."}"#));
}

#[test]
fn test_tools_call_rejects_unknown_fields() {
    let dir = TempDir::new().unwrap();
    let db = init_db(&dir);
    logimas()
        .arg("--db-path")
        .arg(&db)
        .args([
            "--format",
            "json",
            "tools",
            "call",
            "inventory-level-lookup",
            r#"{"sku":"PROD0001","warehouse":"W1"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"is_error\": true"))
        .stdout(predicate::str::contains("invalid arguments"));
}

#[test]
fn test_tools_call_without_database_fails() {
    let dir = TempDir::new().unwrap();
    logimas()
        .arg("--db-path")
        .arg(dir.path().join("missing.db"))
        .args(["tools", "call", "order-details-lookup", r#"{"order_id":"O-1"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("logimas init"));
}

#[test]
fn test_init_prompts_writes_templates() {
    let dir = TempDir::new().unwrap();
    let prompts = dir.path().join("prompts");
    logimas()
        .arg("init-prompts")
        .arg("--dir")
        .arg(&prompts)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 7 prompt template(s)"));
    assert!(prompts.join("warehouse.md").exists());
}

#[test]
fn test_ask_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    let db = init_db(&dir);
    logimas()
        .arg("--db-path")
        .arg(&db)
        .args(["ask", "Where is shipment SHP-1001?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key missing"));
}

#[test]
fn test_route_rejects_empty_query() {
    logimas()
        .args(["route", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Query cannot be empty"));
}
