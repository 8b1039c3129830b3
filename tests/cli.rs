//! End-to-end CLI checks against a temporary dump directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;


fn write_dumps(dir: &std::path::Path) {
    std::fs::write(
        dir.join("feedbacks.json"),
        r#"[
            {"id": "fb-1", "email": "maria@example.com", "feedbackType": "Location Feedback",
             "location": "Fort Santiago", "rating": 5, "comment": "Beautiful",
             "createdAt": "2025-09-03T08:00:00Z"},
            {"id": "fb-2", "feedbackType": "Location Feedback",
             "location": "Fort Santiago", "rating": 4, "comment": "",
             "createdAt": "2025-09-03T12:00:00Z"},
            {"id": "fb-3", "feedbackType": "Location Feedback",
             "location": "Rizal Park", "rating": 2, "comment": "Crowded",
             "createdAt": "2025-09-04T09:00:00Z"},
            {"id": "fb-4", "feedbackType": "App Feedback",
             "feature": "AR Camera", "rating": 3, "comment": "Laggy"}
        ]"#,
    )
    .unwrap();

    std::fs::write(
        dir.join("users.json"),
        r#"[
            {"id": "u-1", "email": "juan@example.com", "name": "Juan", "age": 28,
             "gender": "male", "userType": "registered",
             "registeredDate": "2025-08-15T10:00:00Z", "activeStatus": true,
             "status": "registered"},
            {"id": "u-2", "email": "old@example.com", "name": "Old", "age": 40,
             "gender": "female", "userType": "registered",
             "registeredDate": "2025-07-01T10:00:00Z", "activeStatus": false,
             "status": "archived"}
        ]"#,
    )
    .unwrap();
}


fn tki(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tki").unwrap();
    cmd.env("HOME", home.path());
    cmd
}


#[test]
fn report_writes_expected_sections() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    write_dumps(data.path());

    let out = data.path().join("report.md");
    tki(&home)
        .args(["report", "--data-dir"])
        .arg(data.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report = std::fs::read_to_string(&out).unwrap();
    assert!(report.contains("# TourKita Feedback Report"));
    assert!(report.contains("## Feedback Volume by Month"));
    assert!(report.contains("- Fort Santiago: avg 4.5 across 2 entries"));
    assert!(report.contains("Top rated: Fort Santiago. Needs attention: Rizal Park."));
    // fb-4 has no createdAt; it is excluded from temporal sections
    assert!(report.contains("(1 entries had no usable date and were excluded)"));
    // Archived users never show up in demographics
    assert!(report.contains("Registered users: 1"));
}


#[test]
fn export_csv_writes_documented_columns() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    write_dumps(data.path());

    let out = data.path().join("summary.csv");
    tki(&home)
        .args(["export", "csv", "--data-dir"])
        .arg(data.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("period,group,count,rated_count,average\n"));
    assert!(csv.contains("Sep 2025,Fort Santiago,2,2,4.5"));
    assert!(csv.contains("Sep 2025,Rizal Park,1,1,2.0"));
}


#[test]
fn update_then_fast_report_reads_snapshot() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    write_dumps(data.path());

    tki(&home)
        .args(["update", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 4 feedback records and 2 users"));

    // Fast mode reads the snapshot; no dumps needed anymore
    let empty = TempDir::new().unwrap();
    let out = data.path().join("fast-report.md");
    tki(&home)
        .args(["report", "--fast", "--data-dir"])
        .arg(empty.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let report = std::fs::read_to_string(&out).unwrap();
    assert!(report.contains("- Fort Santiago: avg 4.5 across 2 entries"));
}


#[test]
fn fast_mode_without_database_explains_itself() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();

    tki(&home)
        .args(["dashboard", "--fast", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Run 'tki update' first"));
}


#[test]
fn missing_data_dir_is_not_an_error() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();

    tki(&home)
        .args(["dashboard", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No TourKita data found"));
}


#[test]
fn no_subcommand_prints_help() {
    let home = TempDir::new().unwrap();

    tki(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("drill"))
        .stdout(predicate::str::contains("report"));
}
