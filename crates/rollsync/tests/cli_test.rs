//! Integration tests for the `rollsync` CLI binary.
//!
//! Argument parsing, help, completions, and error handling run without a
//! service. The offline tests read a seeded store directory; the online
//! ones point `--base-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rollsync` binary with env isolation.
///
/// Clears all `ROLLSYNC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn rollsync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rollsync");
    cmd.env("HOME", "/tmp/rollsync-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/rollsync-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/rollsync-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("ROLLSYNC_PROFILE")
        .env_remove("ROLLSYNC_BASE_URL")
        .env_remove("ROLLSYNC_STORE_DIR")
        .env_remove("ROLLSYNC_OUTPUT")
        .env_remove("ROLLSYNC_INSECURE")
        .env_remove("ROLLSYNC_TIMEOUT")
        .env_remove("ROLLSYNC_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// A command bound to `store` and a base URL. Nothing listens on the
/// default URL, so any request it makes fails fast.
fn store_cmd(store: &Path, base_url: &str) -> assert_cmd::Command {
    let mut cmd = rollsync_cmd();
    cmd.arg("--base-url")
        .arg(base_url)
        .arg("--store-dir")
        .arg(store)
        .args(["--timeout", "5"]);
    cmd
}

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn seed(store: &Path, key: &str, value: &serde_json::Value) {
    std::fs::write(store.join(format!("{key}.json")), value.to_string()).unwrap();
}

fn sign_in(store: &Path) {
    std::fs::write(store.join("token.json"), "tok-1").unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a prepared command off the async runtime so wiremock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = rollsync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    rollsync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("roster")
            .and(predicate::str::contains("people"))
            .and(predicate::str::contains("subjects"))
            .and(predicate::str::contains("events")),
    );
}

#[test]
fn test_version_flag() {
    rollsync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rollsync"));
}

#[test]
fn test_fleet_aliases_resolve() {
    for args in [
        ["drivers", "--help"],
        ["routes", "--help"],
        ["telemetry", "--help"],
    ] {
        rollsync_cmd().args(args).assert().success();
    }
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    rollsync_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    rollsync_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = rollsync_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_people_list_without_profile() {
    rollsync_cmd()
        .args(["people", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile"));
}

#[test]
fn test_invalid_output_format() {
    let output = rollsync_cmd()
        .args(["--output", "invalid", "people", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_path_without_config() {
    rollsync_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_bad_status_is_rejected_before_any_request() {
    let store = tempfile::tempdir().unwrap();
    store_cmd(store.path(), UNREACHABLE)
        .args(["events", "record", "--person", "1", "--subject", "2"])
        .args(["--status", "sick"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("status"));
}

// ── Offline (fallback store) ────────────────────────────────────────

#[test]
fn test_offline_list_reads_the_store() {
    let store = tempfile::tempdir().unwrap();
    seed(
        store.path(),
        "people",
        &json!([{ "id": 1, "identifier": "P1", "name": "Ann" }]),
    );

    store_cmd(store.path(), UNREACHABLE)
        .args(["-o", "json", "people", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Ann\""))
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_offline_fleet_vocabulary_lists_same_records() {
    let store = tempfile::tempdir().unwrap();
    seed(
        store.path(),
        "subjects",
        &json!([{ "id": 5, "routeCode": "R-9", "routeName": "Harbour loop" }]),
    );

    store_cmd(store.path(), UNREACHABLE)
        .args(["-q", "-o", "plain", "routes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    store_cmd(store.path(), UNREACHABLE)
        .args(["-o", "plain", "routes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));
}

#[test]
fn test_status_offline_counts_stored_records() {
    let store = tempfile::tempdir().unwrap();
    seed(
        store.path(),
        "people",
        &json!([{ "id": 1, "name": "Ann" }, { "id": 2, "name": "Bo" }]),
    );

    store_cmd(store.path(), UNREACHABLE)
        .args(["-o", "json-compact", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"people\":2").and(predicate::str::contains(
            "\"degraded\":true",
        )));
}

#[test]
fn test_store_seed_then_info() {
    let store = tempfile::tempdir().unwrap();
    let file = store.path().join("people-input.json");
    std::fs::write(
        &file,
        json!([{ "id": 1, "name": "Ann" }, { "id": 2, "name": "Bo" }]).to_string(),
    )
    .unwrap();

    store_cmd(store.path(), UNREACHABLE)
        .args(["store", "seed", "drivers", "--file"])
        .arg(&file)
        .assert()
        .success();

    store_cmd(store.path(), UNREACHABLE)
        .args(["-o", "json-compact", "store", "info"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"people\":2")
                .and(predicate::str::contains("\"signed out\"")),
        );
}

#[test]
fn test_store_seed_rejects_malformed_file() {
    let store = tempfile::tempdir().unwrap();
    let file = store.path().join("bad.json");
    std::fs::write(&file, "{ not json").unwrap();

    store_cmd(store.path(), UNREACHABLE)
        .args(["store", "seed", "people", "--file"])
        .arg(&file)
        .assert()
        .failure();
    assert!(!store.path().join("people.json").exists());
}

#[test]
fn test_logout_clears_session_files() {
    let store = tempfile::tempdir().unwrap();
    sign_in(store.path());
    seed(store.path(), "user", &json!({ "name": "Ann" }));
    seed(store.path(), "currentTeacher", &json!({ "id": 1 }));

    store_cmd(store.path(), UNREACHABLE)
        .arg("logout")
        .assert()
        .success();

    for key in ["token", "user", "currentTeacher", "currentStudent"] {
        assert!(!store.path().join(format!("{key}.json")).exists(), "{key}");
    }
}

// ── Online (wiremock) ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_stores_the_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/teacher/login"))
        .and(body_partial_json(json!({ "email": "ann@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "tok-9",
            "user": { "id": 1, "name": "Ann", "email": "ann@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = tempfile::tempdir().unwrap();
    let mut cmd = store_cmd(store.path(), &server.uri());
    cmd.args(["login", "--role", "fleet", "--email", "ann@example.com"])
        .args(["--password", "pw"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Signed in as Ann"));
    assert_eq!(
        std::fs::read_to_string(store.path().join("token.json")).unwrap(),
        "tok-9"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/student/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Wrong password"
        })))
        .mount(&server)
        .await;

    let store = tempfile::tempdir().unwrap();
    let mut cmd = store_cmd(store.path(), &server.uri());
    cmd.args(["login", "--role", "driver", "--identifier", "STU1"])
        .args(["--email", "bo@example.com", "--password", "nope"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Wrong password"));
    assert!(!store.path().join("token.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_signed_in_list_uses_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/people"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "identifier": "P1", "name": "Ann" },
                { "id": 2, "identifier": "P2", "name": "Bo" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subjects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": []
        })))
        .mount(&server)
        .await;

    let store = tempfile::tempdir().unwrap();
    sign_in(store.path());
    seed(store.path(), "people", &json!([{ "id": 9, "name": "Stale" }]));

    let mut cmd = store_cmd(store.path(), &server.uri());
    cmd.args(["-o", "plain", "drivers", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n2\n");
    assert!(!combined_output(&output).contains("Not signed in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_write_surfaces_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/people"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "duplicate identifier"
        })))
        .mount(&server)
        .await;

    let store = tempfile::tempdir().unwrap();
    sign_in(store.path());
    let mut cmd = store_cmd(store.path(), &server.uri());
    cmd.args(["people", "add", "--name", "Ann", "--identifier", "P1"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("duplicate identifier"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_clears_credential() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/subjects/5"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = tempfile::tempdir().unwrap();
    sign_in(store.path());
    let mut cmd = store_cmd(store.path(), &server.uri());
    cmd.args(["routes", "remove", "5"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("rollsync login"));
    assert!(!store.path().join("token.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_during_list_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/people"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subjects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": []
        })))
        .mount(&server)
        .await;

    let store = tempfile::tempdir().unwrap();
    sign_in(store.path());
    let mut cmd = store_cmd(store.path(), &server.uri());
    cmd.args(["drivers", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("rollsync login"));
    assert!(!store.path().join("token.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_stats_tally_the_person() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/person/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "personId": 1, "subjectId": 5, "date": "2024-03-01", "status": "present" },
                { "id": 2, "personId": 1, "subjectId": 5, "date": "2024-03-02", "status": "absent" },
                { "id": 3, "personId": 1, "subjectId": 6, "date": "2024-03-02", "status": "present" }
            ]
        })))
        .mount(&server)
        .await;

    let store = tempfile::tempdir().unwrap();
    sign_in(store.path());
    let mut cmd = store_cmd(store.path(), &server.uri());
    cmd.args(["-o", "json-compact", "telemetry", "stats", "1", "--route", "5"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"total\":2"), "{stdout}");
    assert!(stdout.contains("\"percentage\":50.0"), "{stdout}");
}
