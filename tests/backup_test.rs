// Integration tests for capture file housekeeping

use airsurvey::capture::{backup_existing_csvs, find_latest_csv};
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn csv_count(dir: &std::path::Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "csv"))
        .count()
}

#[test]
fn test_backup_moves_every_csv() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.csv"), "a").unwrap();
    fs::write(dir.path().join("b.csv"), "b").unwrap();
    fs::write(dir.path().join("keep.txt"), "k").unwrap();
    assert!(!dir.path().join("backup_csvs").exists());

    let moved = backup_existing_csvs(dir.path(), "backup_csvs").unwrap();
    assert_eq!(moved, 2);

    let backup = dir.path().join("backup_csvs");
    assert!(backup.is_dir());
    assert_eq!(csv_count(dir.path()), 0);
    assert!(dir.path().join("keep.txt").exists());

    let mut names: Vec<String> = fs::read_dir(&backup)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names.len(), 2);

    for (name, original) in names.iter().zip(["a.csv", "b.csv"]) {
        // YYYYmmdd-HHMMSS-<original>
        let (stamp, rest) = name.split_at(15);
        assert_eq!(rest, format!("-{}", original));
        assert_eq!(&stamp[8..9], "-");
        assert!(stamp
            .chars()
            .enumerate()
            .all(|(i, c)| i == 8 || c.is_ascii_digit()));
    }
}

#[test]
fn test_backup_reuses_existing_directory() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("backup_csvs")).unwrap();
    fs::write(dir.path().join("scanfile-01.csv"), "x").unwrap();

    assert_eq!(backup_existing_csvs(dir.path(), "backup_csvs").unwrap(), 1);
    assert_eq!(csv_count(dir.path()), 0);
    assert_eq!(csv_count(&dir.path().join("backup_csvs")), 1);
}

#[test]
fn test_latest_csv_by_modification_time() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("scanfile-02.csv"), "old").unwrap();
    thread::sleep(Duration::from_millis(1100));
    fs::write(dir.path().join("scanfile-01.csv"), "new").unwrap();

    let latest = find_latest_csv(dir.path(), "scanfile").unwrap();
    assert_eq!(latest.file_name().unwrap(), "scanfile-01.csv");
}

#[test]
fn test_latest_csv_in_empty_dir() {
    let dir = tempdir().unwrap();
    assert!(find_latest_csv(dir.path(), "scanfile").is_none());
}
