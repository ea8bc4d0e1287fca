//! Smoke tests for the snapverify CLI

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use image::{Rgba, RgbaImage};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the snapverify binary
fn snapverify() -> Command {
    Command::cargo_bin("snapverify").expect("snapverify binary should exist")
}

fn write_png(path: &Path, width: u32, height: u32, color: Rgba<u8>) {
    RgbaImage::from_pixel(width, height, color).save(path).unwrap();
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    snapverify()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    snapverify()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("cleanup"))
        .stdout(predicate::str::contains("data"));
}

#[test]
fn test_no_args_fails() {
    snapverify().assert().failure();
}

// ============================================================================
// compare
// ============================================================================

#[test]
fn test_compare_identical_succeeds() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.png");
    let b = temp.path().join("b.png");
    write_png(&a, 8, 8, Rgba([1, 2, 3, 255]));
    write_png(&b, 8, 8, Rgba([1, 2, 3, 255]));

    snapverify()
        .args(["--color", "never", "compare"])
        .arg(&a)
        .arg(&b)
        .arg("--comparison-dir")
        .arg(temp.path().join("diffs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("images match"))
        .stdout(predicate::str::contains("baseline:").not());
    assert!(!temp.path().join("diffs").exists());
}

#[test]
fn test_compare_verbose_lists_inputs() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.png");
    write_png(&a, 4, 4, Rgba([7, 7, 7, 255]));

    snapverify()
        .args(["--color", "never", "-v", "compare"])
        .arg(&a)
        .arg(&a)
        .arg("--comparison-dir")
        .arg(temp.path().join("diffs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("baseline: "))
        .stdout(predicate::str::contains("current: "));
}

#[test]
fn test_compare_mismatch_exits_nonzero_and_writes_diff() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.png");
    let b = temp.path().join("b.png");
    write_png(&a, 8, 8, Rgba([1, 2, 3, 255]));
    write_png(&b, 8, 8, Rgba([200, 2, 3, 255]));
    let diffs = temp.path().join("diffs");

    snapverify()
        .args(["--color", "never", "compare"])
        .arg(&a)
        .arg(&b)
        .args(["--name", "home"])
        .arg("--comparison-dir")
        .arg(&diffs)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("100.00%"))
        .stderr(predicate::str::contains("Images do not match"));

    let written: Vec<_> = fs::read_dir(&diffs).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn test_compare_tolerance_and_json() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.png");
    let b = temp.path().join("b.png");
    write_png(&a, 4, 4, Rgba([100, 100, 100, 255]));
    write_png(&b, 4, 4, Rgba([101, 101, 101, 255]));

    snapverify()
        .arg("compare")
        .arg(&a)
        .arg(&b)
        .args(["--tolerance", "3", "--json"])
        .arg("--comparison-dir")
        .arg(temp.path().join("diffs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"match\""));
}

#[test]
fn test_compare_rejects_bad_threshold() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.png");
    write_png(&a, 2, 2, Rgba([0, 0, 0, 255]));

    snapverify()
        .arg("compare")
        .arg(&a)
        .arg(&a)
        .args(["--threshold", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside [0, 1]"));
}

#[test]
fn test_compare_missing_file() {
    let temp = TempDir::new().unwrap();
    snapverify()
        .arg("compare")
        .arg(temp.path().join("x.png"))
        .arg(temp.path().join("y.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode"));
}

// ============================================================================
// cleanup
// ============================================================================

#[test]
fn test_cleanup_missing_directories() {
    let temp = TempDir::new().unwrap();
    snapverify()
        .args(["--color", "never", "cleanup", "--days", "7", "--comparisons"])
        .arg("--screenshot-dir")
        .arg(temp.path().join("shots"))
        .arg("--comparison-dir")
        .arg(temp.path().join("diffs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted 0"));
}

#[test]
fn test_cleanup_defaults_to_thirty_days() {
    let temp = TempDir::new().unwrap();
    let shots = temp.path().join("shots");
    fs::create_dir_all(&shots).unwrap();
    for (name, days) in [("stale.png", 31), ("fresh.png", 29)] {
        let file = fs::File::create(shots.join(name)).unwrap();
        file.set_modified(
            std::time::SystemTime::now() - std::time::Duration::from_secs(days * 86_400),
        )
        .unwrap();
    }

    snapverify()
        .args(["--color", "never", "cleanup"])
        .arg("--screenshot-dir")
        .arg(&shots)
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted 1, kept 1"));
    assert!(!shots.join("stale.png").exists());
    assert!(shots.join("fresh.png").exists());
}

#[test]
fn test_cleanup_zero_days_deletes() {
    let temp = TempDir::new().unwrap();
    let shots = temp.path().join("shots");
    fs::create_dir_all(&shots).unwrap();
    write_png(&shots.join("old.png"), 1, 1, Rgba([0, 0, 0, 255]));
    std::thread::sleep(std::time::Duration::from_millis(20));

    snapverify()
        .args(["--color", "never", "-v", "cleanup", "--days", "0"])
        .arg("--screenshot-dir")
        .arg(&shots)
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted 1"))
        .stdout(predicate::str::contains("deleted: "))
        .stdout(predicate::str::contains("old.png"));
    assert!(!shots.join("old.png").exists());
}

// ============================================================================
// data
// ============================================================================

#[test]
fn test_data_csv_json() {
    let temp = TempDir::new().unwrap();
    let csv = temp.path().join("logins.csv");
    fs::write(&csv, "user,pass\nann,\"a,b\"\n").unwrap();

    snapverify()
        .args(["data", "csv"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pass\": \"a,b\""));
}

#[test]
fn test_data_csv_projection_unknown_column() {
    let temp = TempDir::new().unwrap();
    let csv = temp.path().join("logins.csv");
    fs::write(&csv, "user,pass\nann,x\n").unwrap();

    snapverify()
        .args(["data", "csv"])
        .arg(&csv)
        .args(["--columns", "user,email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column"));
}

#[test]
fn test_data_sheet_missing_workbook() {
    let temp = TempDir::new().unwrap();
    snapverify()
        .args(["data", "sheet"])
        .arg(temp.path().join("none.xlsx"))
        .args(["--sheet", "Main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_prints_effective_settings() {
    snapverify()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("screenshot_dir: test-output/screenshots"))
        .stdout(predicate::str::contains("default_threshold: 0.05"));
}

#[test]
fn test_config_file_and_flag_layering() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("snapverify.yaml");
    fs::write(&file, "comparison_dir: from-file\ncollision: overwrite\n").unwrap();

    snapverify()
        .arg("--config")
        .arg(&file)
        .args(["--screenshot-dir", "from-flag", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("screenshot_dir: from-flag"))
        .stdout(predicate::str::contains("comparison_dir: from-file"))
        .stdout(predicate::str::contains("collision: overwrite"));
}

#[test]
fn test_config_invalid_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("bad.yaml");
    fs::write(&file, "default_threshold: 3.0\n").unwrap();

    snapverify()
        .arg("--config")
        .arg(&file)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside [0, 1]"));
}
