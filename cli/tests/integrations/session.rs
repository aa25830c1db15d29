use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ALUMINUM_JSON: &str = include_str!("../../../upreport/tests/data/aluminum.json");

fn workspace(with_project: bool) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    if with_project {
        fs::write(data.join("aluminum.json"), ALUMINUM_JSON).unwrap();
    }
    temp_dir
}

fn upreport(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("upreport").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("UPREPORT_DATA_DIR", temp_dir.path().join("data"))
        .env("UPREPORT_OUTPUT_DIR", temp_dir.path().join("output"))
        .env("UPREPORT_CALC_DIR", temp_dir.path().join("calculations"))
        .env("UPREPORT_TEMPLATE_DIR", temp_dir.path().join("template"))
        .env_remove("UPREPORT_PORT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_quit() {
    let temp_dir = workspace(true);

    upreport(&temp_dir)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("MAIN MENU: Select an option"))
        .stdout(predicate::str::contains(" 1 ..... connect to JSON-LD"))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn test_cli_end_of_input_quits() {
    let temp_dir = workspace(true);

    upreport(&temp_dir)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn test_cli_writes_markdown_report() {
    let temp_dir = workspace(true);

    upreport(&temp_dir)
        .write_stdin("1\n1b\n1\ny\n1\ny\n4b\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Product system set to 'Aluminum, production mix, shape casted'",
        ))
        .stdout(predicate::str::contains("Markdown report saved to"));

    let report = temp_dir
        .path()
        .join("output")
        .join("Aluminum_production_mix_shape_casted.md");
    let md = fs::read_to_string(report).unwrap();
    assert!(md.starts_with("# Overview\n\n## Process Name\nAluminum, production mix, shape casted\n"));
    assert!(md.contains("## Reference Flow\n1 kg Aluminum, cast\n"));
}

#[test]
fn test_cli_fails_without_project_files() {
    let temp_dir = workspace(false);

    upreport(&temp_dir)
        .write_stdin("1b\n")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("!!! No JSON-LD files !!!"));
}

#[test]
fn test_cli_logs_stay_off_stdout() {
    let temp_dir = workspace(true);

    upreport(&temp_dir)
        .env("RUST_LOG", "upreport=info")
        .write_stdin("2b\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "!!! Failed to connect to IPC server on port 8080 !!!",
        ))
        .stdout(predicate::str::contains("connection failed").not())
        .stderr(predicate::str::contains("connection failed"));
}
