//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn folio() -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    // Keep the developer's env files and database out of the tests
    let home = tempfile::tempdir().unwrap();
    cmd.env("HOME", home.path())
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_top_level_help_lists_commands() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("maintenance"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_serve_help() {
    folio()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"))
        .stdout(predicate::str::contains("--memory"));
}

#[test]
fn test_maintenance_rejects_unknown_action() {
    folio()
        .args(["maintenance", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_migrate_without_database_url_fails() {
    let workdir = tempfile::tempdir().unwrap();
    folio()
        .current_dir(workdir.path())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_completions_bash() {
    folio()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_log_filter_from_dotenv_applies() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(workdir.path().join(".env"), "RUST_LOG=debug\n").unwrap();

    folio()
        .current_dir(workdir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded configuration from: current directory"));
}
