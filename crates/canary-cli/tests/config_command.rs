use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_canary_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("canary")
}

fn canary() -> Command {
    let mut cmd = Command::new(get_canary_bin());
    cmd.env_remove("CANARY_BASE_URL")
        .env_remove("CANARY_SELECTOR")
        .env_remove("CHROME");
    cmd
}

fn effective_config(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_config_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = canary();
    cmd.current_dir(dir.path()).arg("config");

    let config = effective_config(&mut cmd);

    assert_eq!(config["base_url"], "http://localhost:4200/");
    assert_eq!(config["root_selector"], "app-root");
    assert_eq!(config["network_idle"]["quiet_period_ms"], 500);
    assert_eq!(config["visibility_timeout_ms"], 5000);
}

#[test]
fn test_config_flags_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = canary();
    cmd.current_dir(dir.path())
        .arg("config")
        .arg("--base-url")
        .arg("http://127.0.0.1:8080")
        .arg("--selector")
        .arg("#root")
        .arg("--visibility-timeout")
        .arg("1500");

    let config = effective_config(&mut cmd);

    assert_eq!(config["base_url"], "http://127.0.0.1:8080");
    assert_eq!(config["root_selector"], "#root");
    assert_eq!(config["visibility_timeout_ms"], 1500);
}

#[test]
fn test_config_env_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "base_url": "http://from-file:4200", "parallel": true }}"#).unwrap();

    let mut cmd = canary();
    cmd.env("CANARY_BASE_URL", "http://from-env:4200")
        .arg("config")
        .arg("--config")
        .arg(file.path());

    let config = effective_config(&mut cmd);

    assert_eq!(config["base_url"], "http://from-env:4200");
    assert_eq!(config["parallel"], true);
}

#[test]
fn test_config_picks_up_canary_json_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("canary.json"),
        r#"{ "root_selector": "app-shell" }"#,
    )
    .unwrap();

    let mut cmd = canary();
    cmd.current_dir(dir.path()).arg("config");

    let config = effective_config(&mut cmd);

    assert_eq!(config["root_selector"], "app-shell");
}

#[test]
fn test_config_rejects_invalid_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = canary();
    cmd.current_dir(dir.path())
        .arg("config")
        .arg("--base-url")
        .arg("ftp://example.com");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_config_rejects_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let mut cmd = canary();
    cmd.arg("config").arg("--config").arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}
