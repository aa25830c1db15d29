use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("upreport").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_help_names_environment() {
    let mut cmd = Command::cargo_bin("upreport").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("UPREPORT_DATA_DIR"));
}

#[test]
fn test_cli_rejects_invalid_port_variable() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("upreport").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("UPREPORT_PORT", "eighty")
        .write_stdin("q\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("UPREPORT_PORT"));
}
