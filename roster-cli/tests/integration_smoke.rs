//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("roster").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Deadline for each HTTP request"))
        .stdout(predicate::str::contains("--default-limit"));
}

#[test]
fn test_migrate_help() {
    let mut cmd = Command::cargo_bin("roster").unwrap();
    cmd.arg("migrate").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_serve_rejects_zero_default_limit() {
    let mut cmd = Command::cargo_bin("roster").unwrap();
    cmd.current_dir(std::env::temp_dir())
        .env_remove("DEFAULT_LIMIT")
        .arg("serve")
        .arg("--database-url")
        .arg("postgres://localhost/unused")
        .arg("--default-limit")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("DEFAULT_LIMIT must be greater than zero"));
}

#[test]
fn test_unknown_command_fails() {
    let mut cmd = Command::cargo_bin("roster").unwrap();
    cmd.arg("frobnicate");

    cmd.assert().failure();
}
