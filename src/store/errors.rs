//! Record store error types
//!
//! Error codes:
//! - LINESTORE_READ_FAILED: the store file exists but could not be read
//! - LINESTORE_WRITE_FAILED: append or rewrite did not complete
//! - LINESTORE_INVALID_RECORD: a record was refused before serialization
//!
//! A missing store file is never an error; readers treat it as empty.

use std::fmt;
use std::io;

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Store file could not be opened or read
    ReadFailed,
    /// Append, temp write, fsync or rename failed
    WriteFailed,
    /// Record has the wrong arity or a field that would break the line format
    InvalidRecord,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::ReadFailed => "LINESTORE_READ_FAILED",
            StoreErrorCode::WriteFailed => "LINESTORE_WRITE_FAILED",
            StoreErrorCode::InvalidRecord => "LINESTORE_INVALID_RECORD",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message and optional context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StoreError {
    /// Create a read failure carrying the underlying I/O error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::ReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a write failure carrying the underlying I/O error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::WriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create an invalid-record error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::InvalidRecord,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create an invalid-record error pointing at one field
    pub fn invalid_field(index: usize, reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::InvalidRecord,
            message: reason.into(),
            details: Some(format!("field_index: {}", index)),
            source: None,
        }
    }

    /// Attach extra context, replacing any existing details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error came from the write path.
    ///
    /// Invalid records are refused before any byte is written, so they are not.
    pub fn is_write_side(&self) -> bool {
        self.code == StoreErrorCode::WriteFailed
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
