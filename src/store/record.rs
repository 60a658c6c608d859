//! Record and line layout
//!
//! One record per line, fields joined by a single delimiter character:
//!
//! ```text
//! S001|Jane Doe|CS|1\n
//! ```
//!
//! There is no escaping. A field that contains the delimiter or a line
//! terminator is refused at encode time instead of corrupting the file.

use std::fmt;

use super::errors::{StoreError, StoreResult};

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = '|';

/// One fixed-arity tuple of string fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Replace one field in place. Returns false if `index` is out of range.
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Builder form of [`Record::set_field`]; out-of-range indexes are ignored.
    pub fn with_field(mut self, index: usize, value: impl Into<String>) -> Self {
        self.set_field(index, value);
        self
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Record {
    fn from(fields: [S; N]) -> Self {
        Record::new(fields)
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Self {
        Self { fields }
    }
}

/// Why a stored line could not be decoded into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    /// Splitting on the delimiter gave the wrong number of fields
    FieldCount { expected: usize, found: usize },
    /// Line bytes are not UTF-8
    InvalidUtf8,
}

impl fmt::Display for LineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineFault::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            LineFault::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

/// Arity and delimiter shared by every record of one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    arity: usize,
    delimiter: char,
}

impl RecordLayout {
    /// Layout with `arity` fields and the default `|` delimiter.
    pub fn new(arity: usize) -> Self {
        Self {
            arity,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(self, delimiter: char) -> Self {
        Self { delimiter, ..self }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Check that `record` can be written as exactly one decodable line.
    pub fn validate(&self, record: &Record) -> StoreResult<()> {
        if self.arity == 0 {
            return Err(StoreError::invalid_record("layout has no fields"));
        }

        if record.arity() != self.arity {
            return Err(StoreError::invalid_record(format!(
                "record has {} fields, store expects {}",
                record.arity(),
                self.arity
            )));
        }

        for (index, field) in record.fields().iter().enumerate() {
            if field.contains(self.delimiter) {
                return Err(StoreError::invalid_field(
                    index,
                    format!("field contains the delimiter '{}'", self.delimiter),
                ));
            }
            if field.contains('\n') || field.contains('\r') {
                return Err(StoreError::invalid_field(
                    index,
                    "field contains a line break",
                ));
            }
        }

        // A lone empty field would serialize to a blank line, which readers ignore
        if self.arity == 1 && record.fields()[0].is_empty() {
            return Err(StoreError::invalid_field(0, "single field must not be empty"));
        }

        Ok(())
    }

    /// Serialize a record to one newline-terminated line.
    pub fn encode(&self, record: &Record) -> StoreResult<String> {
        self.validate(record)?;

        let mut line = String::with_capacity(
            record.fields().iter().map(String::len).sum::<usize>() + self.arity + 1,
        );
        for (index, field) in record.fields().iter().enumerate() {
            if index > 0 {
                line.push(self.delimiter);
            }
            line.push_str(field);
        }
        line.push('\n');
        Ok(line)
    }

    /// Parse one line with its terminator already stripped.
    pub fn decode(&self, line: &str) -> Result<Record, LineFault> {
        let fields: Vec<String> = line.split(self.delimiter).map(str::to_string).collect();
        if fields.len() != self.arity {
            return Err(LineFault::FieldCount {
                expected: self.arity,
                found: fields.len(),
            });
        }
        Ok(Record::from(fields))
    }
}
