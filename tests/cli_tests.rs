//! CLI Integration Tests
//!
//! Runs the sheetdiff binary via assert_cmd against fixture workbooks.

// Skip all CLI tests during coverage builds
#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

mod common;

use assert_cmd::Command;
use common::{new_fixture, old_fixture, write_book, V};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sheetdiff(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sheetdiff").unwrap();
    cmd.current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("SHEETDIFF_CONFIG")
        .env_remove("SHEETDIFF_INPUT_DIR")
        .env_remove("SHEETDIFF_OUTPUT_DIR");
    cmd
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| name.ends_with(ext))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    let temp = TempDir::new().unwrap();
    sheetdiff(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMANDS"))
        .stdout(predicate::str::contains("latest"));
}

#[test]
fn test_cli_version() {
    let temp = TempDir::new().unwrap();
    sheetdiff(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sheetdiff"));
}

// ═══════════════════════════════════════════════════════════════════════════
// COMPARE COMMAND
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_compare_writes_workbook_and_report() {
    let temp = TempDir::new().unwrap();
    old_fixture(&temp.path().join("old.xlsx"));
    new_fixture(&temp.path().join("new.xlsx"));

    sheetdiff(temp.path())
        .args(["compare", "old.xlsx", "new.xlsx", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary of Changes"))
        .stdout(predicate::str::contains("| Sheet1     | 3 changes"))
        .stdout(predicate::str::contains("Missing in new file"));

    let out = temp.path().join("out");
    assert_eq!(files_with_extension(&out, ".xlsx").len(), 1);
    let reports = files_with_extension(&out, ".txt");
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("difference_"));

    let report = fs::read_to_string(out.join(&reports[0])).unwrap();
    assert!(report.contains("Sheet1!B2: '10' -> '12'"));
}

#[test]
fn test_compare_show_cells() {
    let temp = TempDir::new().unwrap();
    old_fixture(&temp.path().join("old.xlsx"));
    new_fixture(&temp.path().join("new.xlsx"));

    sheetdiff(temp.path())
        .args([
            "compare",
            "old.xlsx",
            "new.xlsx",
            "--no-highlight",
            "--report",
            "none",
            "--show-cells",
            "--max-cells",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sheet1!B2: '10' -> '12'"))
        .stdout(predicate::str::contains("Sheet1!A3: 'None' -> 'pear'"))
        .stdout(predicate::str::contains("... and 1 more"));

    // Nothing requested on disk
    assert!(!temp.path().join("Output").exists());
}

#[test]
fn test_compare_json_report_and_archive() {
    let temp = TempDir::new().unwrap();
    old_fixture(&temp.path().join("old.xlsx"));
    new_fixture(&temp.path().join("new.xlsx"));

    sheetdiff(temp.path())
        .args(["compare", "old.xlsx", "new.xlsx", "--report", "json", "--archive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundled"));

    let out = temp.path().join("Output");
    assert_eq!(files_with_extension(&out, ".json").len(), 1);
    let zips = files_with_extension(&out, ".zip");
    assert_eq!(zips.len(), 1);

    let archive = zip::ZipArchive::new(fs::File::open(out.join(&zips[0])).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
}

#[test]
fn test_fail_on_diff_exit_code() {
    let temp = TempDir::new().unwrap();
    old_fixture(&temp.path().join("old.xlsx"));
    new_fixture(&temp.path().join("new.xlsx"));
    old_fixture(&temp.path().join("same.xlsx"));

    sheetdiff(temp.path())
        .args(["compare", "old.xlsx", "new.xlsx", "--no-highlight", "-r", "none", "--fail-on-diff"])
        .assert()
        .code(1);

    sheetdiff(temp.path())
        .args(["compare", "old.xlsx", "same.xlsx", "--no-highlight", "-r", "none", "--fail-on-diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("identical"));
}

#[test]
fn test_compare_tolerance_hides_small_changes() {
    let temp = TempDir::new().unwrap();
    write_book(&temp.path().join("a.xlsx"), &[("S", vec![(0, 0, V::N(1.0))])]);
    write_book(&temp.path().join("b.xlsx"), &[("S", vec![(0, 0, V::N(1.2))])]);

    sheetdiff(temp.path())
        .args(["compare", "a.xlsx", "b.xlsx", "--no-highlight", "-r", "none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 changes"));

    sheetdiff(temp.path())
        .args([
            "compare",
            "a.xlsx",
            "b.xlsx",
            "--no-highlight",
            "-r",
            "none",
            "--tolerance",
            "0.5",
            "--fail-on-diff",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("identical"));
}

#[test]
fn test_compare_negative_tolerance_is_rejected() {
    let temp = TempDir::new().unwrap();
    old_fixture(&temp.path().join("old.xlsx"));
    new_fixture(&temp.path().join("new.xlsx"));

    sheetdiff(temp.path())
        .args(["compare", "old.xlsx", "new.xlsx", "--tolerance=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));

    assert!(!temp.path().join("Output").exists());
}

#[test]
fn test_compare_formulas_flag() {
    let temp = TempDir::new().unwrap();
    write_book(
        &temp.path().join("a.xlsx"),
        &[("S", vec![(0, 0, V::N(12.0)), (0, 1, V::F("=A1*2", 24.0))])],
    );
    write_book(
        &temp.path().join("b.xlsx"),
        &[("S", vec![(0, 0, V::N(12.0)), (0, 1, V::F("=A1+12", 24.0))])],
    );

    sheetdiff(temp.path())
        .args(["compare", "a.xlsx", "b.xlsx", "--no-highlight", "-r", "none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("identical"));

    sheetdiff(temp.path())
        .args([
            "compare",
            "a.xlsx",
            "b.xlsx",
            "--no-highlight",
            "-r",
            "none",
            "--formulas",
            "--show-cells",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("S!B1: '=A1*2' -> '=A1+12'"))
        .stdout(predicate::str::contains("1 changes"));
}

#[test]
fn test_compare_missing_file() {
    let temp = TempDir::new().unwrap();
    old_fixture(&temp.path().join("old.xlsx"));

    sheetdiff(temp.path())
        .args(["compare", "old.xlsx", "missing.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

// ═══════════════════════════════════════════════════════════════════════════
// LATEST AND LIST COMMANDS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_latest_by_version() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("excel_files");
    fs::create_dir(&dir).unwrap();
    old_fixture(&dir.join("Book V1.0.0.xlsx"));
    old_fixture(&dir.join("Book V1.9.0.xlsx"));
    new_fixture(&dir.join("Book V1.10.0.xlsx"));

    sheetdiff(temp.path())
        .args(["latest", "--no-highlight", "-r", "none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book V1.9.0.xlsx"))
        .stdout(predicate::str::contains("Book V1.10.0.xlsx"))
        .stdout(predicate::str::contains("3 changes"));
}

#[test]
fn test_latest_by_date_from_config() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("reports");
    fs::create_dir(&dir).unwrap();
    old_fixture(&dir.join("sales_2024-01-31.xlsx"));
    new_fixture(&dir.join("sales_2024-02-29.xlsx"));
    old_fixture(&dir.join("sales_2023-12-31.xlsx"));
    fs::write(
        temp.path().join("sheetdiff.yaml"),
        "input_dir: reports\nselect_by: date\nreport: none\n",
    )
    .unwrap();

    sheetdiff(temp.path())
        .args(["latest", "--no-highlight"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sales_2024-01-31.xlsx"))
        .stdout(predicate::str::contains("sales_2024-02-29.xlsx"));
}

#[test]
fn test_latest_from_environment() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("books");
    fs::create_dir(&dir).unwrap();
    old_fixture(&dir.join("Book V2.0.0.xlsx"));
    new_fixture(&dir.join("Book V2.1.0.xlsx"));
    let config_dir = temp.path().join("settings");
    fs::create_dir(&config_dir).unwrap();
    fs::write(config_dir.join("custom.yaml"), "report: json\n").unwrap();

    sheetdiff(temp.path())
        .arg("latest")
        .env("SHEETDIFF_INPUT_DIR", &dir)
        .env("SHEETDIFF_OUTPUT_DIR", temp.path().join("results"))
        .env("SHEETDIFF_CONFIG", config_dir.join("custom.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Book V2.0.0.xlsx"))
        .stdout(predicate::str::contains("Book V2.1.0.xlsx"));

    let results = temp.path().join("results");
    assert_eq!(files_with_extension(&results, ".xlsx").len(), 1);
    assert_eq!(files_with_extension(&results, ".json").len(), 1);
    assert!(files_with_extension(&results, ".txt").is_empty());
    assert!(!temp.path().join("Output").exists());
    assert!(!temp.path().join("excel_files").exists());
}

#[test]
fn test_latest_creates_missing_directory() {
    let temp = TempDir::new().unwrap();

    sheetdiff(temp.path())
        .arg("latest")
        .assert()
        .failure()
        .stdout(predicate::str::contains("created").not())
        .stderr(predicate::str::contains("created").count(1));

    assert!(temp.path().join("excel_files").is_dir());
}

#[test]
fn test_latest_not_enough_files() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("excel_files");
    fs::create_dir(&dir).unwrap();
    old_fixture(&dir.join("Book V1.0.0.xlsx"));

    sheetdiff(temp.path())
        .arg("latest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not enough spreadsheet files"));
}

#[test]
fn test_list_marks_old_and_new() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("excel_files");
    fs::create_dir(&dir).unwrap();
    for name in ["Book V1.0.0.xlsx", "Book V1.2.0.xlsx", "Book V1.1.0.xlsx", "notes.txt"] {
        fs::write(dir.join(name), b"").unwrap();
    }

    sheetdiff(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("| Book V1.1.0.xlsx | 1.1.0   | -    | old  |"))
        .stdout(predicate::str::contains("| Book V1.2.0.xlsx | 1.2.0   | -    | new  |"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("sheetdiff.yaml"), "highlight:\n  fill_color: red\n").unwrap();

    sheetdiff(temp.path())
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
