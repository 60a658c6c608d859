//! CLI-specific error types
//!
//! Config and I/O errors end the process. Store errors are reported by the
//! menu that hit them and the menu carries on. End of input ends the menu
//! loop with the usual goodbye.

use std::fmt;
use std::io;

use crate::store::StoreError;
use crate::tools::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout, data directory)
    IoError,
    /// A store or tool operation failed
    StoreError,
    /// stdin reached end of file
    EndOfInput,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "LINESTORE_CLI_CONFIG_ERROR",
            Self::IoError => "LINESTORE_CLI_IO_ERROR",
            Self::StoreError => "LINESTORE_CLI_STORE_ERROR",
            Self::EndOfInput => "LINESTORE_CLI_END_OF_INPUT",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn end_of_input() -> Self {
        Self::new(CliErrorCode::EndOfInput, "No more input")
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_end_of_input(&self) -> bool {
        self.code == CliErrorCode::EndOfInput
    }

    /// Store failures abort one operation, not the session
    pub fn is_recoverable(&self) -> bool {
        self.code == CliErrorCode::StoreError
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::config_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

impl From<ToolError> for CliError {
    fn from(e: ToolError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
