#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("creneau-cli").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn book_and_rebook_through_the_cli() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .args(["add-doctor", "--name", "Dr Rao", "--slot-minutes", "30"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());

    cli(dir.path())
        .args([
            "set-shift",
            "--doctor",
            "Dr Rao",
            "--day",
            "mon",
            "--morning",
            "09:00-13:00",
        ])
        .assert()
        .success();

    cli(dir.path())
        .args(["slots", "--doctor", "Dr Rao", "--date", "2024-03-11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00 → 09:30"));

    cli(dir.path())
        .args([
            "book",
            "--doctor",
            "Dr Rao",
            "--date",
            "2024-03-11",
            "--time",
            "09:00",
            "--patient",
            "Amina",
        ])
        .assert()
        .success();

    // le même créneau perd la course, code 2, sans trace écrite
    cli(dir.path())
        .args([
            "book",
            "--doctor",
            "Dr Rao",
            "--date",
            "2024-03-11",
            "--time",
            "09:00",
            "--patient",
            "Bruno",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already booked"));

    cli(dir.path())
        .args(["slots", "--doctor", "Dr Rao", "--date", "2024-03-11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00 →").not());

    // jour chômé : message explicite plutôt qu'une sortie vide
    cli(dir.path())
        .args(["slots", "--doctor", "Dr Rao", "--date", "2024-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no open slots"));

    cli(dir.path())
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no issues"));
}

#[test]
fn imported_leave_suppresses_the_day() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("leaves.csv"),
        "from,to,reason\n2024-03-10,2024-03-12,conference\n",
    )
    .unwrap();

    cli(dir.path())
        .args(["add-doctor", "--name", "Dr Rao", "--slot-minutes", "30"])
        .assert()
        .success();
    cli(dir.path())
        .args([
            "set-shift",
            "--doctor",
            "Dr Rao",
            "--day",
            "mon",
            "--morning",
            "09:00-13:00",
        ])
        .assert()
        .success();
    cli(dir.path())
        .args(["import-leaves", "--doctor", "Dr Rao", "--csv", "leaves.csv"])
        .assert()
        .success();

    cli(dir.path())
        .args(["slots", "--doctor", "Dr Rao", "--date", "2024-03-11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("on leave: conference"))
        .stdout(predicate::str::contains("09:00").not());
}

#[test]
fn check_reports_inverted_ranges_with_code_2() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .args(["add-doctor", "--name", "Dr Rao"])
        .assert()
        .success();
    // plage inversée refusée dès la saisie
    cli(dir.path())
        .args([
            "set-shift",
            "--doctor",
            "Dr Rao",
            "--day",
            "mon",
            "--morning",
            "13:00-09:00",
        ])
        .assert()
        .failure();

    // jour travaillé sans demi-journée : signalé par check
    cli(dir.path())
        .args([
            "set-shift",
            "--doctor",
            "Dr Rao",
            "--day",
            "mon",
        ])
        .assert()
        .success();
    cli(dir.path())
        .args(["check", "--report", "issues.csv"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("issue"));

    let report = std::fs::read_to_string(dir.path().join("issues.csv")).unwrap();
    assert!(report.contains("empty_working_day"));
}
