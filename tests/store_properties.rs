//! Record Store Property Tests
//!
//! - Append then read yields the record verbatim
//! - Delete by unique key removes exactly one record
//! - Update of non-key fields leaves other records byte-identical
//! - A missing file reads as an empty store
//! - A malformed line is skipped without aborting the read

use linestore::store::{LineFault, Record, RecordLayout, RecordStore, StoreErrorCode};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn student_store(dir: &TempDir) -> RecordStore {
    RecordStore::new(dir.path().join("students.txt"), RecordLayout::new(4))
}

fn student(id: &str, name: &str, course: &str, year: &str) -> Record {
    Record::from([id, name, course, year])
}

// =============================================================================
// Append / Read
// =============================================================================

#[test]
fn test_append_then_read_is_verbatim() {
    let dir = create_temp_data_dir();
    let store = student_store(&dir);

    let record = student("S001", "  Jane  Doe ", "CS, Honors", "1");
    store.append(&record).unwrap();

    assert_eq!(store.records().unwrap(), vec![record]);
}

#[test]
fn test_jane_doe_example() {
    let dir = create_temp_data_dir();
    let store = student_store(&dir);

    store.append(&student("S001", "Jane Doe", "CS", "1")).unwrap();
    assert_eq!(
        store.records().unwrap(),
        vec![student("S001", "Jane Doe", "CS", "1")]
    );

    let removed = store.delete(|r| r.field(0) == Some("S001")).unwrap();
    assert_eq!(removed, 1);
    assert!(store.records().unwrap().is_empty());
}

#[test]
fn test_appends_keep_order() {
    let dir = create_temp_data_dir();
    let store = student_store(&dir);

    for i in 1..=5 {
        store
            .append(&student(&format!("S00{}", i), "Name", "CS", "1"))
            .unwrap();
    }

    let ids: Vec<String> = store
        .records()
        .unwrap()
        .iter()
        .map(|r| r.field(0).unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["S001", "S002", "S003", "S004", "S005"]);
}

#[test]
fn test_missing_file_reads_empty() {
    let dir = create_temp_data_dir();
    let store = RecordStore::new(dir.path().join("nested/never.txt"), RecordLayout::new(3));

    let outcome = store.read_all().unwrap();
    assert!(outcome.records.is_empty());
    assert!(outcome.is_clean());
    assert!(!dir.path().join("nested").exists());
}

// =============================================================================
// Delete / Update
// =============================================================================

#[test]
fn test_delete_unique_key_leaves_others() {
    let dir = create_temp_data_dir();
    let store = student_store(&dir);

    store.append(&student("S001", "Jane Doe", "CS", "1")).unwrap();
    store.append(&student("S002", "John Roe", "IT", "2")).unwrap();
    store.append(&student("S003", "Ana Cruz", "Math", "3")).unwrap();

    assert_eq!(store.delete(|r| r.field(0) == Some("S002")).unwrap(), 1);
    assert_eq!(
        store.records().unwrap(),
        vec![
            student("S001", "Jane Doe", "CS", "1"),
            student("S003", "Ana Cruz", "Math", "3"),
        ]
    );
}

#[test]
fn test_update_preserves_key_and_other_lines() {
    let dir = create_temp_data_dir();
    let store = student_store(&dir);
    let path = dir.path().join("students.txt");

    store.append(&student("S001", "Jane Doe", "CS", "1")).unwrap();
    store.append(&student("S002", "John Roe", "IT", "2")).unwrap();

    let changed = store
        .update(|r| r.field(0) == Some("S001"), |r| r.clone().with_field(2, "Physics"))
        .unwrap();
    assert_eq!(changed, 1);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "S001|Jane Doe|Physics|1");
    assert_eq!(lines[1], "S002|John Roe|IT|2");
}

#[test]
fn test_no_match_does_not_create_file() {
    let dir = create_temp_data_dir();
    let store = student_store(&dir);

    assert_eq!(store.delete(|_| true).unwrap(), 0);
    assert_eq!(store.update(|_| true, |r| r.clone()).unwrap(), 0);
    assert!(!dir.path().join("students.txt").exists());
}

// =============================================================================
// Malformed Lines
// =============================================================================

#[test]
fn test_malformed_line_skipped_not_fatal() {
    let dir = create_temp_data_dir();
    let path = dir.path().join("students.txt");
    fs::write(
        &path,
        "S001|Jane Doe|CS|1\nS002|John Roe|IT\n\nS003|Ana Cruz|Math|3|extra\nS004|Li Wei|CS|4\n",
    )
    .unwrap();

    let outcome = student_store(&dir).read_all().unwrap();
    assert_eq!(
        outcome.records,
        vec![
            student("S001", "Jane Doe", "CS", "1"),
            student("S004", "Li Wei", "CS", "4"),
        ]
    );
    assert_eq!(outcome.skipped.len(), 2);
    assert_eq!(outcome.skipped[0].line_number, 2);
    assert_eq!(
        outcome.skipped[0].fault,
        LineFault::FieldCount {
            expected: 4,
            found: 3
        }
    );
    assert_eq!(outcome.skipped[1].line_number, 4);
}

#[test]
fn test_invalid_utf8_and_crlf() {
    let dir = create_temp_data_dir();
    let path = dir.path().join("students.txt");
    let mut bytes = b"S001|Jane Doe|CS|1\r\n".to_vec();
    bytes.extend_from_slice(b"S002|\xff\xfe|IT|2\n");
    bytes.extend_from_slice(b"S003|Ana Cruz|Math|3");
    fs::write(&path, bytes).unwrap();

    let outcome = student_store(&dir).read_all().unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].field(3), Some("1"));
    assert_eq!(outcome.records[1].field(0), Some("S003"));
    assert_eq!(outcome.skipped[0].fault, LineFault::InvalidUtf8);
}

// =============================================================================
// Field Validation
// =============================================================================

#[test]
fn test_delimiter_in_field_is_rejected_before_write() {
    let dir = create_temp_data_dir();
    let store = student_store(&dir);
    store.append(&student("S001", "Jane Doe", "CS", "1")).unwrap();
    let before = fs::read(dir.path().join("students.txt")).unwrap();

    let err = store
        .append(&student("S002", "John|Roe", "IT", "2"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::InvalidRecord);

    let err = store
        .append(&student("S002", "John\nRoe", "IT", "2"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::InvalidRecord);

    assert!(store.append(&Record::from(["S002", "John Roe", "IT"])).is_err());
    assert_eq!(fs::read(dir.path().join("students.txt")).unwrap(), before);
}

#[test]
fn test_custom_delimiter() {
    let dir = create_temp_data_dir();
    let store = RecordStore::new(
        dir.path().join("grades.txt"),
        RecordLayout::new(3).with_delimiter(';'),
    );

    store.append(&Record::from(["Alice", "Math|Advanced", "95"])).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("grades.txt")).unwrap(),
        "Alice;Math|Advanced;95\n"
    );
    assert_eq!(store.records().unwrap()[0].field(1), Some("Math|Advanced"));
}
