//! CLI-level tests for argument validation and exit codes

use assert_cmd::Command;
use predicates::prelude::*;

fn revid() -> Command {
    Command::cargo_bin("revid").expect("binary builds")
}

#[test]
fn help_lists_the_commands() {
    revid()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("score"));
}

#[test]
fn missing_input_folder_exits_nonzero() {
    let temp = tempfile::tempdir().unwrap();
    revid()
        .current_dir(temp.path())
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn non_positive_speed_is_rejected_before_any_work() {
    let temp = tempfile::tempdir().unwrap();
    revid()
        .current_dir(temp.path())
        .args(["process", "--speed", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Playback speed"));
}

#[test]
fn out_of_range_speed_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    revid()
        .current_dir(temp.path())
        .args(["process", "--speed", "1.8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn empty_input_folder_is_not_an_error() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir(temp.path().join("videos")).unwrap();
    revid()
        .current_dir(temp.path())
        .arg("process")
        .assert()
        .success();
}
