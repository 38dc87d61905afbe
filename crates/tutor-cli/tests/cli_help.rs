use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("tutor")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("questions"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("--skip-gate"))
        .stdout(predicate::str::contains("--duration"));
}

#[test]
fn test_questions_help_shows_subcommands() {
    cargo_bin_cmd!("tutor")
        .args(["questions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("tutor")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_session_requires_terminal() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("tutor")
        .env("TUTOR_HOME", dir.path())
        .arg("--skip-gate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}

#[test]
fn test_zero_duration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("tutor")
        .env("TUTOR_HOME", dir.path())
        .args(["--duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("round_duration_secs must be greater than zero"));
}
