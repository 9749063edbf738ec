//! Integration tests for the scan, dupes, large and usage commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

fn dupe_sweeper() -> Command {
    let mut cmd = Command::cargo_bin("dupe-sweeper").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/nonexistent");
    cmd
}

fn write_file(path: &std::path::Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

/// Two 100-byte copies, one 100-byte lookalike, small text files and one big video
fn create_test_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write_file(&root.join("photos/a.jpg"), &[1u8; 100]);
    write_file(&root.join("backup/a-copy.jpg"), &[1u8; 100]);
    write_file(&root.join("backup/other.jpg"), &[2u8; 100]);

    for i in 0..12 {
        write_file(&root.join(format!("notes/note{}.txt", i)), &[b'x'; 10]);
    }

    write_file(&root.join("movies/clip.mp4"), &vec![0u8; 64 * 1024]);

    dir
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_scan_basic() {
    let dir = create_test_tree();

    dupe_sweeper()
        .arg("scan")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Scanned 16 files"))
        .stdout(predicate::str::contains("content not compared"))
        .stdout(predicate::str::contains("clip.mp4"));
}

#[test]
fn test_scan_json_output() {
    let dir = create_test_tree();

    let report = json_stdout(dupe_sweeper().args(["scan", "--json"]).arg(dir.path()));

    assert_eq!(report["file_count"], 16);
    assert_eq!(report["total_bytes"], 300 + 120 + 64 * 1024);

    // Size-only grouping: 10-byte notes and 100-byte images
    let groups = report["duplicates"].as_array().unwrap();
    assert_eq!(groups.len(), 2);

    let large = report["large"]["files"].as_array().unwrap();
    assert_eq!(large.len(), 1);
    assert!(large[0]["path"].as_str().unwrap().ends_with("clip.mp4"));

    assert_eq!(report["usage"][".txt"], 120);
    assert_eq!(report["usage"][".jpg"], 300);
}

#[test]
fn test_scan_empty_directory() {
    let dir = TempDir::new().unwrap();

    dupe_sweeper()
        .arg("scan")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Scanned 0 files"))
        .stdout(predicate::str::contains("No files found"));
}

#[test]
fn test_scan_sequential_matches_parallel() {
    let dir = create_test_tree();

    let parallel = json_stdout(dupe_sweeper().args(["scan", "--json"]).arg(dir.path()));
    let sequential = json_stdout(
        dupe_sweeper()
            .args(["scan", "--json", "--sequential"])
            .arg(dir.path()),
    );

    assert_eq!(parallel["file_count"], sequential["file_count"]);
    assert_eq!(parallel["duplicates"], sequential["duplicates"]);
    assert_eq!(parallel["usage"], sequential["usage"]);
}

#[test]
fn test_scan_respects_depth() {
    let dir = create_test_tree();
    write_file(&dir.path().join("top.bin"), &[0u8; 5]);

    let report = json_stdout(
        dupe_sweeper()
            .args(["scan", "--json", "-d", "1"])
            .arg(dir.path()),
    );
    assert_eq!(report["file_count"], 1);
}

#[test]
fn test_scan_skips_hidden_on_request() {
    let dir = create_test_tree();
    write_file(&dir.path().join(".cache/blob.bin"), &[0u8; 50]);

    let all = json_stdout(dupe_sweeper().args(["scan", "--json"]).arg(dir.path()));
    let visible = json_stdout(
        dupe_sweeper()
            .args(["scan", "--json", "--no-hidden"])
            .arg(dir.path()),
    );

    assert_eq!(all["file_count"], 17);
    assert_eq!(visible["file_count"], 16);
}

#[test]
fn test_dupes_size_only_lists_lookalike() {
    let dir = create_test_tree();

    let value = json_stdout(dupe_sweeper().args(["dupes", "--json"]).arg(dir.path()));
    assert_eq!(value["verified"], false);

    let groups = value["groups"].as_array().unwrap();
    let images = groups.iter().find(|g| g["size"] == 100).unwrap();
    assert_eq!(images["paths"].as_array().unwrap().len(), 3);
}

#[test]
fn test_dupes_verify_drops_lookalike() {
    let dir = create_test_tree();

    let value = json_stdout(
        dupe_sweeper()
            .args(["dupes", "--json", "--verify"])
            .arg(dir.path()),
    );
    assert_eq!(value["verified"], true);

    let groups = value["groups"].as_array().unwrap();
    let images = groups.iter().find(|g| g["size"] == 100).unwrap();
    let paths: Vec<&str> = images["paths"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| !p.ends_with("other.jpg")));
}

#[test]
fn test_dupes_text_output_is_numbered() {
    let dir = create_test_tree();

    dupe_sweeper()
        .arg("dupes")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Group 1"))
        .stdout(predicate::str::contains("Group 2"));
}

#[test]
fn test_large_reports_outlier() {
    let dir = create_test_tree();

    dupe_sweeper()
        .arg("large")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard deviation"))
        .stdout(predicate::str::contains("clip.mp4"))
        .stdout(predicate::str::contains("note0.txt").not());
}

#[test]
fn test_large_empty_directory() {
    let dir = TempDir::new().unwrap();

    dupe_sweeper()
        .arg("large")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found"));
}

#[test]
fn test_usage_by_extension() {
    let dir = create_test_tree();

    let value = json_stdout(dupe_sweeper().args(["usage", "--json"]).arg(dir.path()));
    assert_eq!(value["usage"][".mp4"], 64 * 1024);
    assert_eq!(value["usage"][".txt"], 120);
}

#[test]
fn test_usage_by_category_reports_zero_totals() {
    let dir = create_test_tree();

    let value = json_stdout(
        dupe_sweeper()
            .args([
                "usage",
                "--json",
                "--by-category",
                "--category",
                "video,image,audio",
            ])
            .arg(dir.path()),
    );
    assert_eq!(value["usage"]["video"], 64 * 1024);
    assert_eq!(value["usage"]["image"], 300);
    assert_eq!(value["usage"]["audio"], 0);
    assert!(value["usage"].get("document").is_none());
}

#[test]
fn test_usage_text_output() {
    let dir = create_test_tree();

    dupe_sweeper()
        .args(["usage", "--by-category"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("video"))
        .stdout(predicate::str::contains("document"));
}
