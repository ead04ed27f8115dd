//! Integration tests for the `iiec` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes run
//! without a backend; the end-to-end cases point the binary at a wiremock
//! server and keep config and tokens inside a temp directory.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `iiec` binary with env isolation.
///
/// Clears all `IIEC_*` env vars and points config/data directories at
/// `home` so tests never touch the user's real configuration.
fn iiec_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("iiec");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("IIEC_PROFILE")
        .env_remove("IIEC_API_URL")
        .env_remove("IIEC_OUTPUT")
        .env_remove("IIEC_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Where the file token store keeps the default profile's token on Linux.
fn token_path(home: &Path) -> PathBuf {
    home.join("data").join("iiec").join("default").join("admin_token")
}

fn write_token(home: &Path, token: &str) {
    let path = token_path(home);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, token).unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = iiec_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("IIEC")
            .and(predicate::str::contains("projects"))
            .and(predicate::str::contains("events"))
            .and(predicate::str::contains("products")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("iiec"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = iiec_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = iiec_cmd(home.path())
        .args(["--output", "invalid", "projects", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_list_without_login_exits_auth() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9", "projects", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path())
        .args(["--profile", "prod", "products", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("prod"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_set_then_profiles() {
    let home = TempDir::new().unwrap();
    iiec_cmd(home.path())
        .args(["config", "set", "api_url", "https://api.iiec.example"])
        .assert()
        .success();
    iiec_cmd(home.path())
        .args(["config", "set", "write_policy", "surface"])
        .assert()
        .success();

    iiec_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("* default")
                .and(predicate::str::contains("https://api.iiec.example")),
        );

    iiec_cmd(home.path())
        .args(["config", "set", "write_policy", "sometimes"])
        .assert()
        .code(2);
}

// ── Against a mock backend ──────────────────────────────────────────

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn test_products_list_json() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_token(home.path(), "tok-123");

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(bearer_token("tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Owl Set", "price": 79.99, "in_stock": true }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = iiec_cmd(home.path())
        .args(["--api-url", &server.uri(), "-o", "json", "products", "list"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["name"], "Owl Set");
    assert_eq!(listed[0]["inStock"], true);
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_is_cleared() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_token(home.path(), "revoked");

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    iiec_cmd(home.path())
        .args(["--api-url", &server.uri(), "events", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Session expired"));

    assert!(!token_path(home.path()).exists());
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn test_failed_delete_reports_local_only() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_token(home.path(), "tok-123");

    Mock::given(method("DELETE"))
        .and(path("/projects/7"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    iiec_cmd(home.path())
        .args(["--api-url", &server.uri(), "--yes", "projects", "delete", "7"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("not saved to the backend"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_update_with_backend_down_is_connection_error() {
    let home = TempDir::new().unwrap();
    write_token(home.path(), "tok-123");

    // Nothing listens on the discard port.
    iiec_cmd(home.path())
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "projects",
            "update",
            "5",
            "--name",
            "Renamed",
        ])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("not found").not());
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn test_update_with_backend_error_is_not_not_found() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    write_token(home.path(), "tok-123");

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let output = iiec_cmd(home.path())
        .args([
            "--api-url",
            &server.uri(),
            "products",
            "update",
            "5",
            "--price",
            "12",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_place_order_needs_no_login() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 41,
            "full_name": "Ada Lovelace",
            "email": "ada@example.org",
            "contact": "555-0100",
            "product_title": "Owl Set",
            "quantity": 2,
            "total_amount": 159.98
        })))
        .expect(1)
        .mount(&server)
        .await;

    iiec_cmd(home.path())
        .args([
            "--api-url",
            &server.uri(),
            "-o",
            "plain",
            "orders",
            "place",
            "--product",
            "Owl Set",
            "--price",
            "79.99",
            "--quantity",
            "2",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.org",
            "--contact",
            "555-0100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("41"));
}
