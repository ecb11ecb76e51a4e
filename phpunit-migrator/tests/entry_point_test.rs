//! Integration tests for the application entry point.
//!
//! Tests the `run_with_args_to` function with various arguments.

#![allow(clippy::unwrap_used)]

use phpunit_migrator::entry_point::run_with_args_to;
use std::fs;
use tempfile::tempdir;

fn run(args: Vec<String>) -> (i32, String) {
    let mut buffer = Vec::new();
    let code = run_with_args_to(args, &mut buffer).unwrap();
    (code, String::from_utf8(buffer).unwrap())
}

#[test]
fn test_version_exits_zero() {
    let (code, out) = run(vec!["--version".to_owned()]);
    assert_eq!(code, 0);
    assert!(out.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_exits_one() {
    let (code, _) = run(vec!["--frobnicate".to_owned()]);
    assert_eq!(code, 1);
}

#[test]
fn test_missing_directory_is_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let (code, out) = run(vec![missing.to_string_lossy().to_string()]);
    assert_eq!(code, 1);
    assert!(out.contains("not a directory"));
}

#[test]
fn test_comma_separated_excludes() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("one")).unwrap();
    fs::create_dir_all(dir.path().join("two")).unwrap();
    fs::write(dir.path().join("one/ATest.php"), "<?php\n").unwrap();
    fs::write(dir.path().join("two/BTest.php"), "<?php\n").unwrap();
    fs::write(dir.path().join("CTest.php"), "<?php\n").unwrap();

    let (code, out) = run(vec![
        "-e".to_owned(),
        "*/one/*,*/two/*".to_owned(),
        dir.path().to_string_lossy().to_string(),
    ]);
    assert_eq!(code, 0);
    assert_eq!(out.matches("process ").count(), 1);
    assert!(out.contains("CTest.php no diff"));
}

#[test]
fn test_run_reports_each_file_in_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("BTest.php"), "<?php\n").unwrap();
    fs::write(
        dir.path().join("ATest.php"),
        "<?php\nclass ATest\n{\n    /** @test */\n    public function a(): void {}\n}\n",
    )
    .unwrap();

    let (code, out) = run(vec![dir.path().to_string_lossy().to_string()]);
    assert_eq!(code, 0);
    let a = out.find("ATest.php").unwrap();
    let b = out.find("BTest.php no diff").unwrap();
    assert!(a < b);
}
