//! Line-by-line store reader
//!
//! - One record per line; `\n` terminates, a trailing `\r` is stripped
//! - Every line keeps its bytes as read, so a rewrite can put untouched lines
//!   back exactly
//! - Blank lines are ignored
//! - A line with the wrong field count, or that is not UTF-8, is returned as
//!   [`StoredLine::Malformed`] and reading continues
//! - A missing file reads as an empty store

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::errors::{StoreError, StoreResult};
use super::record::{LineFault, Record, RecordLayout};

/// Terminator a line was read with. A last line without one counts as `Lf`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// A line that was skipped because it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file
    pub line_number: usize,
    pub fault: LineFault,
    /// Raw bytes without the line terminator
    pub raw: Vec<u8>,
    pub ending: LineEnding,
}

impl SkippedLine {
    /// Raw content for display, with invalid UTF-8 replaced
    pub fn raw_lossy(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }

    /// The line as it is written back on rewrite
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.raw.clone();
        bytes.extend_from_slice(self.ending.as_bytes());
        bytes
    }
}

/// One non-blank line of a store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredLine {
    /// A well-formed record. `original` holds the line as read, terminator
    /// included; it is `None` for records created or replaced in memory.
    Record {
        record: Record,
        original: Option<Vec<u8>>,
    },
    Malformed(SkippedLine),
}

impl StoredLine {
    /// A record with no on-disk form yet; it is encoded when written
    pub fn record(record: Record) -> Self {
        StoredLine::Record {
            record,
            original: None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            StoredLine::Record { record, .. } => Some(record),
            StoredLine::Malformed(_) => None,
        }
    }
}

/// Result of a full read: well-formed records plus everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOutcome {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedLine>,
}

impl ReadOutcome {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl From<Vec<StoredLine>> for ReadOutcome {
    fn from(lines: Vec<StoredLine>) -> Self {
        let mut outcome = ReadOutcome::default();
        for line in lines {
            match line {
                StoredLine::Record { record, .. } => outcome.records.push(record),
                StoredLine::Malformed(skipped) => outcome.skipped.push(skipped),
            }
        }
        outcome
    }
}

/// Sequential reader over any buffered source.
pub struct StoreReader<R> {
    reader: R,
    layout: RecordLayout,
    line_number: usize,
    buf: Vec<u8>,
}

impl StoreReader<BufReader<File>> {
    /// Opens a store file. Returns `Ok(None)` if the file does not exist.
    pub fn open(path: &Path, layout: RecordLayout) -> StoreResult<Option<Self>> {
        match File::open(path) {
            Ok(file) => Ok(Some(Self::from_reader(BufReader::new(file), layout))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::read_failed(
                format!("Failed to open store file: {}", path.display()),
                e,
            )),
        }
    }
}

impl<R: BufRead> StoreReader<R> {
    pub fn from_reader(reader: R, layout: RecordLayout) -> Self {
        Self {
            reader,
            layout,
            line_number: 0,
            buf: Vec::with_capacity(256),
        }
    }

    /// Line number of the last line consumed
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-blank line.
    ///
    /// Only I/O failures are errors; decode failures come back as
    /// `StoredLine::Malformed`.
    pub fn read_next(&mut self) -> StoreResult<Option<StoredLine>> {
        loop {
            self.buf.clear();
            let n = self.reader.read_until(b'\n', &mut self.buf).map_err(|e| {
                StoreError::read_failed("Failed to read store line", e)
                    .with_details(format!("line: {}", self.line_number + 1))
            })?;
            if n == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let mut end = self.buf.len();
            if end > 0 && self.buf[end - 1] == b'\n' {
                end -= 1;
            }
            let mut ending = LineEnding::Lf;
            if end > 0 && self.buf[end - 1] == b'\r' {
                end -= 1;
                ending = LineEnding::CrLf;
            }
            let bytes = &self.buf[..end];
            if bytes.is_empty() {
                continue;
            }

            let decoded = match std::str::from_utf8(bytes) {
                Ok(text) => self.layout.decode(text),
                Err(_) => Err(LineFault::InvalidUtf8),
            };

            return Ok(Some(match decoded {
                Ok(record) => {
                    let mut original = bytes.to_vec();
                    original.extend_from_slice(ending.as_bytes());
                    StoredLine::Record {
                        record,
                        original: Some(original),
                    }
                }
                Err(fault) => StoredLine::Malformed(SkippedLine {
                    line_number: self.line_number,
                    fault,
                    raw: bytes.to_vec(),
                    ending,
                }),
            }));
        }
    }

    /// Reads every remaining line.
    pub fn read_lines(&mut self) -> StoreResult<Vec<StoredLine>> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_next()? {
            lines.push(line);
        }
        Ok(lines)
    }

    pub fn read_all(&mut self) -> StoreResult<ReadOutcome> {
        Ok(ReadOutcome::from(self.read_lines()?))
    }
}
