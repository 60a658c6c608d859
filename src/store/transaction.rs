//! Rewrite transaction: load snapshot, edit in memory, atomic replace
//!
//! Every update and delete goes through a [`Transaction`]. Edits touch only
//! the in-memory snapshot until [`Transaction::commit`], which hands the whole
//! snapshot to [`StoreWriter::replace`]. Dropping a transaction discards it.
//!
//! Malformed lines and records no edit touched keep their original bytes, so
//! a rewrite puts them back exactly as they were read.

use super::errors::StoreResult;
use super::reader::{SkippedLine, StoredLine};
use super::record::Record;
use super::record_store::RecordStore;
use super::writer::StoreWriter;
use crate::observability::{log_event_with_fields, Event, ObservationScope};

pub struct Transaction<'s> {
    store: &'s RecordStore,
    lines: Vec<StoredLine>,
    dirty: bool,
}

impl<'s> Transaction<'s> {
    pub(super) fn new(store: &'s RecordStore, lines: Vec<StoredLine>) -> Self {
        Self {
            store,
            lines,
            dirty: false,
        }
    }

    /// Well-formed records in file order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.lines.iter().filter_map(StoredLine::as_record)
    }

    pub fn record_count(&self) -> usize {
        self.records().count()
    }

    /// Lines that were skipped when the snapshot was loaded
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedLine> {
        self.lines.iter().filter_map(|line| match line {
            StoredLine::Malformed(skipped) => Some(skipped),
            StoredLine::Record { .. } => None,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace every record matching `predicate` with `transform(record)`.
    ///
    /// All replacements are validated against the store layout before any is
    /// applied; on error the snapshot is unchanged. Returns the match count.
    pub fn update<P, T>(&mut self, mut predicate: P, mut transform: T) -> StoreResult<usize>
    where
        P: FnMut(&Record) -> bool,
        T: FnMut(&Record) -> Record,
    {
        let layout = self.store.layout();
        let mut replacements = Vec::new();

        for (index, line) in self.lines.iter().enumerate() {
            if let Some(record) = line.as_record() {
                if predicate(record) {
                    let updated = transform(record);
                    layout.validate(&updated)?;
                    replacements.push((index, updated));
                }
            }
        }

        let count = replacements.len();
        for (index, updated) in replacements {
            self.lines[index] = StoredLine::record(updated);
        }
        if count > 0 {
            self.dirty = true;
        }
        Ok(count)
    }

    /// Keep only records for which `keep` returns true. Returns the number removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Record) -> bool,
    {
        let before = self.lines.len();
        self.lines.retain(|line| match line {
            StoredLine::Record { record, .. } => keep(record),
            StoredLine::Malformed(_) => true,
        });
        let removed = before - self.lines.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Remove every record matching `predicate`. Returns the number removed.
    pub fn delete<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&Record) -> bool,
    {
        self.retain(|record| !predicate(record))
    }

    /// Remove matching records the caller confirms, one prompt per match.
    ///
    /// If `confirm` fails, the error is returned and nothing is removed.
    pub fn delete_confirmed<P, C, E>(&mut self, mut predicate: P, mut confirm: C) -> Result<usize, E>
    where
        P: FnMut(&Record) -> bool,
        C: FnMut(&Record) -> Result<bool, E>,
    {
        let mut doomed = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            if let Some(record) = line.as_record() {
                if predicate(record) && confirm(record)? {
                    doomed.push(index);
                }
            }
        }

        for index in doomed.iter().rev() {
            self.lines.remove(*index);
        }
        if !doomed.is_empty() {
            self.dirty = true;
        }
        Ok(doomed.len())
    }

    /// Remove the record at `index` among well-formed records (0-based).
    pub fn remove_at(&mut self, index: usize) -> Option<Record> {
        let position = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_record().is_some())
            .nth(index)
            .map(|(position, _)| position)?;

        self.dirty = true;
        match self.lines.remove(position) {
            StoredLine::Record { record, .. } => Some(record),
            StoredLine::Malformed(_) => None,
        }
    }

    /// Write the snapshot back with an atomic replace.
    ///
    /// Returns `Ok(false)` without touching the file when nothing changed.
    pub fn commit(self) -> StoreResult<bool> {
        if !self.dirty {
            return Ok(false);
        }

        let path = self.store.path().display().to_string();
        let scope = ObservationScope::with_fields("STORE_REWRITE", &[("path", path.as_str())]);
        let writer = StoreWriter::new(self.store.path(), self.store.layout());

        match writer.replace(&self.lines) {
            Ok(bytes) => {
                let bytes = bytes.to_string();
                let lines = self.lines.len().to_string();
                scope.complete_with_fields(&[("bytes", bytes.as_str()), ("lines", lines.as_str())]);
                Ok(true)
            }
            Err(e) => {
                let reason = e.to_string();
                scope.fail(&reason);
                log_event_with_fields(
                    Event::StoreWriteFailed,
                    &[("path", path.as_str()), ("reason", reason.as_str())],
                );
                Err(e)
            }
        }
    }
}
