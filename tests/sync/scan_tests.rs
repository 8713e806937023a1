// Tests for the tree scanning module

use mirra::sync::{Hasher, ScanEngine, Snapshot, SyncError};
use std::fs;
use std::path::{Path, PathBuf};

#[test]
fn test_scan_single_file() {
    let test_dir = "test_scan_single";
    fs::create_dir_all(test_dir).unwrap();
    fs::write(format!("{}/test.txt", test_dir), b"hello world").unwrap();

    let snapshot = ScanEngine::new().scan(Path::new(test_dir)).unwrap();

    assert_eq!(snapshot.len(), 1);
    let fingerprint = snapshot.get(Path::new("test.txt")).unwrap();
    assert_eq!(*fingerprint, Hasher::new().hash_bytes(b"hello world"));

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_scan_nested_directories() {
    let test_dir = "test_scan_nested";
    fs::create_dir_all(format!("{}/subdir1/subdir2", test_dir)).unwrap();
    fs::write(format!("{}/root.txt", test_dir), b"root").unwrap();
    fs::write(format!("{}/subdir1/sub1.txt", test_dir), b"sub1").unwrap();
    fs::write(format!("{}/subdir1/subdir2/sub2.txt", test_dir), b"sub2").unwrap();

    let snapshot = ScanEngine::new().scan(Path::new(test_dir)).unwrap();

    // Keys are root-relative; directories themselves are not entries
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains(Path::new("root.txt")));
    assert!(snapshot.contains(Path::new("subdir1/sub1.txt")));
    assert!(snapshot.contains(Path::new("subdir1/subdir2/sub2.txt")));

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let test_dir = "test_scan_empty";
    fs::create_dir_all(test_dir).unwrap();

    let snapshot = ScanEngine::new().scan(Path::new(test_dir)).unwrap();

    assert!(snapshot.is_empty());

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_scan_nonexistent_root_is_walk_error() {
    let err = ScanEngine::new()
        .scan(Path::new("nonexistent_directory_mirra"))
        .unwrap_err();

    assert!(matches!(err, SyncError::WalkError { .. }));
    assert!(err.is_pass_fatal());
}

#[test]
fn test_scan_parallel_matches_sequential() {
    let test_dir = "test_scan_modes";
    fs::create_dir_all(format!("{}/nested", test_dir)).unwrap();
    fs::write(format!("{}/file1.txt", test_dir), b"test data 1").unwrap();
    fs::write(format!("{}/file2.txt", test_dir), b"test data 2").unwrap();
    fs::write(format!("{}/nested/file3.txt", test_dir), b"test data 3").unwrap();

    let sequential = ScanEngine::with_parallel(false).scan(Path::new(test_dir)).unwrap();
    let parallel = ScanEngine::with_parallel(true).scan(Path::new(test_dir)).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.len(), 3);

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_scan_excludes_configured_file() {
    let test_dir = "test_scan_exclude";
    fs::create_dir_all(test_dir).unwrap();
    fs::write(format!("{}/keep.txt", test_dir), b"keep").unwrap();
    fs::write(format!("{}/journal.log", test_dir), b"log line").unwrap();

    let excluded = format!("{}/journal.log", test_dir);
    let snapshot = ScanEngine::new()
        .with_exclude(&excluded)
        .scan(Path::new(test_dir))
        .unwrap();

    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains(Path::new("keep.txt")));
    assert!(!snapshot.contains(Path::new("journal.log")));

    fs::remove_dir_all(test_dir).unwrap();
}

#[cfg(unix)]
#[test]
fn test_scan_skips_symlinks() {
    use std::os::unix::fs::symlink;

    let test_dir = "test_scan_symlinks";
    fs::create_dir_all(format!("{}/real", test_dir)).unwrap();
    fs::write(format!("{}/real/file.txt", test_dir), b"real").unwrap();
    // Link to a file and a link cycle back to the root
    symlink("real/file.txt", format!("{}/file_link", test_dir)).unwrap();
    symlink("..", format!("{}/real/cycle", test_dir)).unwrap();

    let snapshot = ScanEngine::new().scan(Path::new(test_dir)).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains(Path::new("real/file.txt")));

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_snapshot_last_insert_wins() {
    let hasher = Hasher::new();
    let mut snapshot = Snapshot::new();

    snapshot.insert(PathBuf::from("dup.txt"), hasher.hash_bytes(b"first"));
    snapshot.insert(PathBuf::from("dup.txt"), hasher.hash_bytes(b"second"));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(
        *snapshot.get(Path::new("dup.txt")).unwrap(),
        hasher.hash_bytes(b"second")
    );
}
