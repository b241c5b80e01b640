//! Integration tests for the `domotica` CLI binary.
//!
//! Argument parsing, config management and error exit codes run without a
//! server; request paths run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `domotica` binary with env isolation.
///
/// Points the config directories at `home` and clears `DOMOTICA_*` so
/// tests never touch the user's real configuration.
fn domotica_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("domotica");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("DOMOTICA_BASE_URL")
        .env_remove("DOMOTICA_OUTPUT")
        .env_remove("DOMOTICA_TIMEOUT_SECS")
        .env_remove("DOMOTICA_DASHBOARD__POLL_INTERVAL_SECS")
        .env_remove("DOMOTICA_DASHBOARD__MAX_POINTS")
        .env_remove("DOMOTICA_DASHBOARD__NOTIFICATION_MS");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_get(server: &MockServer, p: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_home(server: &MockServer) {
    mount_get(server, "/api/temperatura", json!({ "temperatura": 22.5 })).await;
    mount_get(server, "/api/detecao-fumaca", json!({ "fumaca": 3 })).await;
    mount_get(server, "/api/luminosidade", json!({ "luminosidade": 410 })).await;
    mount_get(server, "/api/status-ar-condicionado", json!({ "ligado": true })).await;
    mount_get(server, "/api/status-sistema-incendio", json!({ "ativo": false })).await;
    mount_get(server, "/api/status-lampada", json!("desligada")).await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = domotica_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    domotica_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("sensors")
                .and(predicate::str::contains("control"))
                .and(predicate::str::contains("watch")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    domotica_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("domotica"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    domotica_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = domotica_cmd(home.path()).arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_is_under_home() {
    let home = tempfile::tempdir().unwrap();
    domotica_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();

    domotica_cmd(home.path())
        .args(["config", "init", "--base-url", "http://10.0.0.7:5000"])
        .assert()
        .success();

    domotica_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("base_url = \"http://10.0.0.7:5000\"")
                .and(predicate::str::contains("[dashboard]"))
                .and(predicate::str::contains("max_points = 20")),
        );

    // A second init refuses to clobber the file.
    let output = domotica_cmd(home.path())
        .args(["config", "init"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--force"));

    domotica_cmd(home.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_json() {
    let home = tempfile::tempdir().unwrap();
    domotica_cmd(home.path())
        .args(["config", "show", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""base_url":"http://localhost:5000""#,
        ));
}

#[test]
fn test_config_init_rejects_bad_url() {
    let home = tempfile::tempdir().unwrap();
    let output = domotica_cmd(home.path())
        .args(["config", "init", "--base-url", "ftp://example.com"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Validation before any request ───────────────────────────────────

#[test]
fn test_control_rejects_unknown_action() {
    let home = tempfile::tempdir().unwrap();
    let output = domotica_cmd(home.path())
        .args(["-u", "http://127.0.0.1:9", "control", "lamp", "blink"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("blink"));
}

#[test]
fn test_control_rejects_unknown_device() {
    let home = tempfile::tempdir().unwrap();
    let output = domotica_cmd(home.path())
        .args(["-u", "http://127.0.0.1:9", "control", "toaster", "on"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unreachable_server_exit_code() {
    let home = tempfile::tempdir().unwrap();
    let output = domotica_cmd(home.path())
        .args(["-u", "http://127.0.0.1:1", "sensors", "temperature"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("Could not reach"));
}

// ── Against a mock server ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_sensors_table() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_home(&server).await;

    domotica_cmd(home.path())
        .args(["-u", &server.uri(), "sensors"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("22.5°C")
                .and(predicate::str::contains("3.0%"))
                .and(predicate::str::contains("410.0 lx")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sensor_json_output() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_home(&server).await;

    let output = domotica_cmd(home.path())
        .args(["-u", &server.uri(), "-o", "json", "sensors", "temperature"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed,
        json!([{
            "sensor": "temperature",
            "value": 22.5,
            "raw": { "temperatura": 22.5 }
        }])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_plain() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_home(&server).await;

    domotica_cmd(home.path())
        .args(["-u", &server.uri(), "-o", "plain", "status", "lamp"])
        .assert()
        .success()
        .stdout("lamp\tdesligada\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_control_posts_without_body() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ligar-lampada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    domotica_cmd(home.path())
        .args(["-u", &server.uri(), "control", "light", "on"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lamp turned on"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_temperature() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config-ar-condicionado"))
        .and(body_json(json!({ "temperatura": 19.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    domotica_cmd(home.path())
        .args(["-u", &server.uri(), "set-temperature", "19.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("19.5°C"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_endpoint_exit_code() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;

    let output = domotica_cmd(home.path())
        .args(["-u", &server.uri(), "sensors", "smoke"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_table() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/dispositivos",
        json!({
            "dispositivos": [
                { "id": "CAM001", "tipo": "CAMERA", "protocolo": "gRPC", "ip": "10.0.0.9" }
            ],
            "total": 1
        }),
    )
    .await;

    domotica_cmd(home.path())
        .args(["-u", &server.uri(), "devices"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CAM001").and(predicate::str::contains("10.0.0.9")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_single_sweep() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_home(&server).await;

    domotica_cmd(home.path())
        .args(["-u", &server.uri(), "watch", "--interval", "1s", "--ticks", "1"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("sweep 1")
                .and(predicate::str::contains("temperature"))
                .and(predicate::str::contains("22.5°C")),
        );
}
