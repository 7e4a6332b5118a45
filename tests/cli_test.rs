//! End-to-end tests for the `relaychat` binary
//!
//! Every invocation points `--config` at a missing file and clears the
//! environment overrides so the developer's own setup cannot leak in.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_OVERRIDES: &[&str] = &[
    "RELAYCHAT_API_KEY",
    "RELAYCHAT_API_BASE",
    "RELAYCHAT_MODEL",
    "RELAYCHAT_STORAGE_BACKEND",
    "RELAYCHAT_STORAGE_PATH",
    "RELAYCHAT_THEME",
    "RUST_LOG",
];

fn relaychat(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("relaychat").expect("binary should build");
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.arg("--config")
        .arg(config_dir.path().join("missing.yaml"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    relaychat(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_status_without_key_reports_logged_out() {
    let dir = TempDir::new().unwrap();
    relaychat(&dir)
        .args(["--storage", "memory", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_status_with_env_key_reports_configuration() {
    let dir = TempDir::new().unwrap();
    relaychat(&dir)
        .env("RELAYCHAT_API_KEY", "sk-from-env")
        .args(["--storage", "memory", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Logged in (API key from configuration)",
        ))
        .stdout(predicate::str::contains("sk-from-env").not());
}

#[test]
fn test_invalid_backend_env_var_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    relaychat(&dir)
        .env("RELAYCHAT_STORAGE_BACKEND", "floppy")
        .env("RELAYCHAT_API_KEY", "sk-from-env")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Storage: Keyring"));
}

#[test]
fn test_storage_env_vars_apply_without_flags() {
    let dir = TempDir::new().unwrap();
    relaychat(&dir)
        .env("RELAYCHAT_STORAGE_BACKEND", "memory")
        .env("RELAYCHAT_STORAGE_PATH", common::store_path(&dir))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Storage: Memory"));
}

#[test]
fn test_default_log_level_keeps_stderr_quiet() {
    let dir = TempDir::new().unwrap();
    relaychat(&dir)
        .args(["--storage", "memory", "status"])
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO").not())
        .stderr(predicate::str::contains("DEBUG").not());
}

#[test]
fn test_send_without_key_fails_with_not_configured() {
    let dir = TempDir::new().unwrap();
    relaychat(&dir)
        .args(["--storage", "memory", "send", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not configured"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "api:\n  max_tokens: 0\n").unwrap();

    let mut cmd = Command::cargo_bin("relaychat").unwrap();
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.arg("--config")
        .arg(&config_path)
        .args(["--storage", "memory", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_tokens"));
}

#[test]
fn test_login_remembers_key_in_file_store() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(common::models_body()))
            .mount(&server)
            .await;
        server
    });

    let dir = TempDir::new().unwrap();
    let store = common::store_path(&dir);

    relaychat(&dir)
        .env("RELAYCHAT_API_BASE", server.uri())
        .args(["--storage", "file", "--storage-path"])
        .arg(&store)
        .args(["login", "--key", "sk-cli-login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key saved"));

    relaychat(&dir)
        .args(["--storage", "file", "--storage-path"])
        .arg(&store)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in (API key from key store)"));

    relaychat(&dir)
        .args(["--storage", "file", "--storage-path"])
        .arg(&store)
        .arg("logout")
        .assert()
        .success();

    relaychat(&dir)
        .args(["--storage", "file", "--storage-path"])
        .arg(&store)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));

    drop(server);
}
