//! Delimited flat-file record store
//!
//! A store is one text file holding fixed-arity records, one per line, fields
//! joined by a delimiter (`|` by default). It stands in for a database in the
//! interactive tools.
//!
//! # Design Principles
//!
//! - The file is the sole source of truth; no cache between operations
//! - Append is the only in-place write
//! - Update and delete are rewrite transactions ending in an atomic replace
//! - Malformed lines are skipped on read, reported, and carried through
//!   rewrites untouched
//! - A missing file is an empty store
//!
//! ```ignore
//! use linestore::store::{Record, RecordLayout, RecordStore};
//!
//! let store = RecordStore::new("students.txt", RecordLayout::new(4));
//! store.append(&Record::from(["S001", "Jane Doe", "CS", "1"]))?;
//! store.delete(|r| r.field(0) == Some("S001"))?;
//! ```

mod errors;
mod reader;
mod record;
mod record_store;
mod transaction;
mod writer;

pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use reader::{LineEnding, ReadOutcome, SkippedLine, StoreReader, StoredLine};
pub use record::{LineFault, Record, RecordLayout, DEFAULT_DELIMITER};
pub use record_store::RecordStore;
pub use transaction::Transaction;
pub use writer::StoreWriter;
