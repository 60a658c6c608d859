//! Record store: CRUD over one delimited flat file
//!
//! The file is the only source of truth. Nothing is cached between calls:
//! every operation opens, reads or writes, and closes the file.
//!
//! No locking. Two processes editing the same file may race.

use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::reader::{ReadOutcome, StoreReader, StoredLine};
use super::record::{Record, RecordLayout};
use super::transaction::Transaction;
use super::writer::StoreWriter;
use crate::observability::{log_event_with_fields, Event};

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    layout: RecordLayout,
}

impl RecordStore {
    /// Describe a store. Does not touch the filesystem.
    pub fn new(path: impl Into<PathBuf>, layout: RecordLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Append one record, creating the file if absent.
    pub fn append(&self, record: &Record) -> StoreResult<()> {
        let path = self.path.display().to_string();
        match StoreWriter::new(&self.path, self.layout).append(record) {
            Ok(bytes) => {
                let bytes = bytes.to_string();
                log_event_with_fields(
                    Event::StoreAppend,
                    &[("bytes", bytes.as_str()), ("path", path.as_str())],
                );
                Ok(())
            }
            Err(e) => {
                if e.is_write_side() {
                    let reason = e.to_string();
                    log_event_with_fields(
                        Event::StoreWriteFailed,
                        &[("path", path.as_str()), ("reason", reason.as_str())],
                    );
                }
                Err(e)
            }
        }
    }

    /// Read every record. Malformed lines are skipped, logged and reported in
    /// the outcome. A missing file is an empty store.
    pub fn read_all(&self) -> StoreResult<ReadOutcome> {
        Ok(ReadOutcome::from(self.load_lines()?))
    }

    /// Well-formed records only
    pub fn records(&self) -> StoreResult<Vec<Record>> {
        Ok(self.read_all()?.records)
    }

    pub fn find_first<P>(&self, mut predicate: P) -> StoreResult<Option<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        Ok(self.records()?.into_iter().find(|r| predicate(r)))
    }

    pub fn find_all<P>(&self, mut predicate: P) -> StoreResult<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        Ok(self.records()?.into_iter().filter(|r| predicate(r)).collect())
    }

    /// Uniqueness check, e.g. reject a duplicate ID before appending
    pub fn contains<P>(&self, predicate: P) -> StoreResult<bool>
    where
        P: FnMut(&Record) -> bool,
    {
        Ok(self.find_first(predicate)?.is_some())
    }

    /// Load a snapshot for a read-modify-rewrite.
    pub fn begin(&self) -> StoreResult<Transaction<'_>> {
        Ok(Transaction::new(self, self.load_lines()?))
    }

    /// Transform every matching record and rewrite the file.
    ///
    /// Returns the number of records changed. Nothing is written when nothing
    /// matched or when any transformed record is invalid.
    pub fn update<P, T>(&self, predicate: P, transform: T) -> StoreResult<usize>
    where
        P: FnMut(&Record) -> bool,
        T: FnMut(&Record) -> Record,
    {
        let mut txn = self.begin()?;
        let count = txn.update(predicate, transform)?;
        txn.commit()?;
        Ok(count)
    }

    /// Remove every matching record and rewrite the file with the remainder.
    pub fn delete<P>(&self, predicate: P) -> StoreResult<usize>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut txn = self.begin()?;
        let count = txn.delete(predicate);
        txn.commit()?;
        Ok(count)
    }

    /// Like [`RecordStore::delete`], but each match is kept unless `confirm` approves it.
    pub fn delete_confirmed<P, C, E>(&self, predicate: P, confirm: C) -> Result<usize, E>
    where
        P: FnMut(&Record) -> bool,
        C: FnMut(&Record) -> Result<bool, E>,
        E: From<StoreError>,
    {
        let mut txn = self.begin()?;
        let count = txn.delete_confirmed(predicate, confirm)?;
        txn.commit()?;
        Ok(count)
    }

    fn load_lines(&self) -> StoreResult<Vec<StoredLine>> {
        let lines = match StoreReader::open(&self.path, self.layout)? {
            Some(mut reader) => reader.read_lines()?,
            None => return Ok(Vec::new()),
        };

        let path = self.path.display().to_string();
        for line in &lines {
            if let StoredLine::Malformed(skipped) = line {
                let number = skipped.line_number.to_string();
                let reason = skipped.fault.to_string();
                log_event_with_fields(
                    Event::RecordSkipped,
                    &[
                        ("line", number.as_str()),
                        ("path", path.as_str()),
                        ("reason", reason.as_str()),
                    ],
                );
            }
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn students(dir: &TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("students.txt"), RecordLayout::new(4))
    }

    #[test]
    fn test_new_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let store = students(&dir);
        assert!(!store.path().exists());
        assert!(store.records().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_find_first_and_all() {
        let dir = TempDir::new().unwrap();
        let store = students(&dir);
        store.append(&Record::from(["S001", "Jane Doe", "CS", "1"])).unwrap();
        store.append(&Record::from(["S002", "John Roe", "IT", "2"])).unwrap();
        store.append(&Record::from(["S003", "Ana Cruz", "CS", "3"])).unwrap();

        let found = store.find_first(|r| r.field(0) == Some("S002")).unwrap();
        assert_eq!(found.unwrap().field(1), Some("John Roe"));

        let cs = store.find_all(|r| r.field(2) == Some("CS")).unwrap();
        assert_eq!(cs.len(), 2);

        assert!(store.contains(|r| r.field(0) == Some("S003")).unwrap());
        assert!(!store.contains(|r| r.field(0) == Some("S999")).unwrap());
    }

    #[test]
    fn test_update_without_match_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let store = students(&dir);
        assert_eq!(store.update(|_| true, |r| r.clone()).unwrap(), 0);
        assert_eq!(store.delete(|_| true).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_may_match_many() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("grades.txt"), RecordLayout::new(3));
        store.append(&Record::from(["Ana", "Databases", "91"])).unwrap();
        store.append(&Record::from(["Ana", "Networking", "70"])).unwrap();
        store.append(&Record::from(["Ben", "Databases", "80"])).unwrap();

        let changed = store
            .update(|r| r.field(0) == Some("Ana"), |r| r.clone().with_field(0, "Ana Cruz"))
            .unwrap();
        assert_eq!(changed, 2);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "Ana Cruz|Databases|91\nAna Cruz|Networking|70\nBen|Databases|80\n"
        );
    }
}
