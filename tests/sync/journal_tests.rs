// Tests for the audit journal

use mirra::journal::{Journal, LogRecord};
use mirra::sync::ActionKind;
use std::fs;
use std::path::{Path, PathBuf};

#[test]
fn test_record_line_format() {
    let test_dir = "test_journal_format";
    fs::create_dir_all(test_dir).unwrap();
    let log = PathBuf::from(format!("{}/journal.log", test_dir));

    let mut journal = Journal::open(&log).unwrap();
    journal
        .record(&LogRecord::new(ActionKind::Created, "/replica/a.txt"))
        .unwrap();

    let text = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" - Created: /replica/a.txt"));
    // Timestamp leads the line
    assert!(lines[0].chars().take(4).all(|c| c.is_ascii_digit()));

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_lines_append_across_reopens() {
    let test_dir = "test_journal_append";
    fs::create_dir_all(test_dir).unwrap();
    let log = PathBuf::from(format!("{}/journal.log", test_dir));

    {
        let mut journal = Journal::open(&log).unwrap();
        journal
            .record(&LogRecord::new(ActionKind::Created, "/replica/a.txt"))
            .unwrap();
    }
    {
        let mut journal = Journal::open(&log).unwrap();
        journal
            .record(&LogRecord::new(ActionKind::Deleted, "/replica/b.txt"))
            .unwrap();
    }

    let text = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Created"));
    assert!(lines[1].contains("Deleted"));

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_error_line_format() {
    let test_dir = "test_journal_error";
    fs::create_dir_all(test_dir).unwrap();
    let log = PathBuf::from(format!("{}/journal.log", test_dir));

    let mut journal = Journal::open(&log).unwrap();
    journal.error("failed to walk /gone: not found").unwrap();

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains(" - Error: failed to walk /gone: not found"));

    fs::remove_dir_all(test_dir).unwrap();
}

#[test]
fn test_format_line_shape() {
    let record = LogRecord::new(ActionKind::Updated, Path::new("/replica/sub/c.txt"));
    let line = record.format_line();

    assert!(line.ends_with("- Updated: /replica/sub/c.txt"));
    assert!(!line.ends_with('\n'));
}

#[test]
fn test_journal_remembers_its_path() {
    let test_dir = "test_journal_path";
    fs::create_dir_all(test_dir).unwrap();
    let log = PathBuf::from(format!("{}/journal.log", test_dir));

    let journal = Journal::open(&log).unwrap();
    assert_eq!(journal.path(), log.as_path());

    fs::remove_dir_all(test_dir).unwrap();
}
