// Tests for the fingerprinting module

use mirra::sync::{Hasher, SyncError, DEFAULT_CHUNK_SIZE};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_fingerprint_is_deterministic() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"stable content").unwrap();

    let hasher = Hasher::new();
    let first = hasher.hash_file(file.path()).unwrap();
    let second = hasher.hash_file(file.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.as_hex().len(), 64);
}

#[test]
fn test_different_content_different_fingerprint() {
    let mut file1 = NamedTempFile::new().unwrap();
    file1.write_all(b"content a").unwrap();
    let mut file2 = NamedTempFile::new().unwrap();
    file2.write_all(b"content b").unwrap();

    let hasher = Hasher::new();
    let fp1 = hasher.hash_file(file1.path()).unwrap();
    let fp2 = hasher.hash_file(file2.path()).unwrap();

    assert_ne!(fp1, fp2);
}

#[test]
fn test_streaming_matches_whole_buffer() {
    // Larger than the default chunk so several reads are needed
    let data: Vec<u8> = (0..(DEFAULT_CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();

    let hasher = Hasher::new();
    assert_eq!(hasher.hash_file(file.path()).unwrap(), hasher.hash_bytes(&data));
}

#[test]
fn test_empty_file_fingerprint() {
    let file = NamedTempFile::new().unwrap();

    let hasher = Hasher::new();
    let from_file = hasher.hash_file(file.path()).unwrap();

    assert_eq!(from_file, hasher.hash_bytes(b""));
}

#[test]
fn test_unreadable_file_is_read_error() {
    let err = Hasher::new()
        .hash_file(Path::new("no_such_dir_mirra/no_such_file.txt"))
        .unwrap_err();

    assert!(matches!(err, SyncError::ReadError { .. }));
    assert!(!err.is_pass_fatal());
}
