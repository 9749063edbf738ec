//! Integration tests for trashing, recovery and expiry through the CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn dupe_sweeper() -> Command {
    let mut cmd = Command::cargo_bin("dupe-sweeper").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/nonexistent");
    cmd
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn backdate(path: &Path, days: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(days * 86_400))
        .unwrap();
}

fn create_copies() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("photos/a.jpg"), &[1u8; 100]);
    write_file(&dir.path().join("backup/a-copy.jpg"), &[1u8; 100]);
    dir
}

#[test]
fn test_dupes_trash_keeps_selected_member() {
    let dir = create_copies();
    let root = dir.path();

    // Members are sorted: backup/a-copy.jpg is 1, photos/a.jpg is 2
    dupe_sweeper()
        .args(["dupes", "--trash", "1", "--keep", "2"])
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file moved"));

    assert!(root.join("photos/a.jpg").exists());
    assert!(!root.join("backup/a-copy.jpg").exists());
    assert!(root.join("Trash/a-copy.jpg").exists());
}

#[test]
fn test_dupes_trash_rejects_bad_group() {
    let dir = create_copies();

    dupe_sweeper()
        .args(["dupes", "--trash", "5"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid selection"));

    assert!(dir.path().join("backup/a-copy.jpg").exists());
}

#[test]
fn test_trash_list_and_recover() {
    let dir = create_copies();
    let root = dir.path();

    dupe_sweeper()
        .args(["dupes", "--trash", "1", "--keep", "2"])
        .arg(root)
        .assert()
        .success();

    dupe_sweeper()
        .args(["trash", "list", "--root"])
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. a-copy.jpg"));

    // Origins are not persisted, so a later process restores beside the trash
    dupe_sweeper()
        .args(["trash", "recover", "--root"])
        .arg(root)
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovered:"));

    assert!(root.join("a-copy.jpg").exists());
    assert!(!root.join("Trash/a-copy.jpg").exists());
}

#[test]
fn test_trash_recover_to_directory() {
    let dir = create_copies();
    let root = dir.path();
    let restore = TempDir::new().unwrap();

    dupe_sweeper()
        .args(["dupes", "--trash", "1", "--keep", "2"])
        .arg(root)
        .assert()
        .success();

    dupe_sweeper()
        .args(["trash", "recover", "--root"])
        .arg(root)
        .arg("1")
        .arg("--to")
        .arg(restore.path())
        .assert()
        .success();

    assert!(restore.path().join("a-copy.jpg").exists());
}

#[test]
fn test_trash_recover_out_of_range() {
    let dir = create_copies();

    dupe_sweeper()
        .args(["trash", "recover", "--root"])
        .arg(dir.path())
        .arg("3")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_trash_list_empty() {
    let dir = TempDir::new().unwrap();

    dupe_sweeper()
        .args(["trash", "list", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is empty"));
}

#[test]
fn test_trash_sweep_removes_expired_only() {
    let dir = TempDir::new().unwrap();
    let trash = dir.path().join("Trash");
    write_file(&trash.join("old.log"), b"old");
    write_file(&trash.join("recent.log"), b"recent");
    backdate(&trash.join("old.log"), 8);
    backdate(&trash.join("recent.log"), 6);

    dupe_sweeper()
        .args(["trash", "sweep", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 expired file deleted"));

    assert!(!trash.join("old.log").exists());
    assert!(trash.join("recent.log").exists());
}

#[test]
fn test_trash_sweep_custom_days() {
    let dir = TempDir::new().unwrap();
    let trash = dir.path().join("Trash");
    write_file(&trash.join("recent.log"), b"recent");
    backdate(&trash.join("recent.log"), 6);

    dupe_sweeper()
        .args(["trash", "sweep", "--days", "5", "--root"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(!trash.join("recent.log").exists());
}

#[test]
fn test_freshly_trashed_file_survives_sweep() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("ancient.tmp");
    write_file(&old, b"tmp");
    backdate(&old, 365);

    dupe_sweeper()
        .args(["purge-ext", "tmp"])
        .arg(dir.path())
        .assert()
        .success();

    dupe_sweeper()
        .args(["trash", "sweep", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 expired files deleted"));

    assert!(dir.path().join("Trash/ancient.tmp").exists());
}

#[test]
fn test_purge_ext_moves_matching_files() {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("a.tmp"), b"a");
    write_file(&dir.path().join("nested/B.TMP"), b"b");
    write_file(&dir.path().join("keep.txt"), b"c");

    dupe_sweeper()
        .args(["purge-ext", ".tmp"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files moved"));

    assert!(dir.path().join("Trash/a.tmp").exists());
    assert!(dir.path().join("Trash/B.TMP").exists());
    assert!(dir.path().join("keep.txt").exists());
}

#[test]
fn test_purge_ext_collision_suffix() {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("Trash/x.tmp"), b"already trashed");
    write_file(&dir.path().join("x.tmp"), b"new");

    dupe_sweeper()
        .args(["purge-ext", "tmp"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("Trash/x.tmp").exists());
    assert!(dir.path().join("Trash/x (1).tmp").exists());
}

#[test]
fn test_purge_ext_collision_reject_is_partial_failure() {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("Trash/x.tmp"), b"already trashed");
    write_file(&dir.path().join("x.tmp"), b"new");

    let config = dir.path().join("config.toml");
    fs::write(&config, "[trash]\ncollision = \"reject\"\n").unwrap();

    dupe_sweeper()
        .arg("--config")
        .arg(&config)
        .args(["purge-ext", "tmp"])
        .arg(dir.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("x.tmp"));

    assert!(dir.path().join("x.tmp").exists());
}

#[test]
fn test_large_trash_by_number() {
    let dir = TempDir::new().unwrap();
    for i in 0..12 {
        write_file(&dir.path().join(format!("small{}.txt", i)), &[b'x'; 10]);
    }
    write_file(&dir.path().join("huge.iso"), &vec![0u8; 64 * 1024]);

    dupe_sweeper()
        .args(["large", "--trash", "1"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("Trash/huge.iso").exists());
    assert!(dir.path().join("small0.txt").exists());
}
