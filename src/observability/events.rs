//! Observable events
//!
//! Events are explicit and typed. Each carries its default severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Interactive session started
    SessionStart,
    /// Interactive session ended normally
    SessionEnd,
    /// Session ended by Ctrl-C
    Interrupted,
    /// Configuration loaded or defaulted
    ConfigLoaded,

    // Store
    /// Record appended to a store file
    StoreAppend,
    /// Store file atomically replaced
    StoreRewrite,
    /// Malformed line skipped during a read
    RecordSkipped,
    /// Store write failed; file left in its last good state
    StoreWriteFailed,

    // Accounts
    /// Account registered
    AccountRegistered,
    /// Login succeeded
    LoginSucceeded,
    /// Login failed
    LoginFailed,
    /// Username locked after too many failed logins
    AccountLocked,
    /// Operator logged out
    Logout,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SessionStart => "SESSION_START",
            Event::SessionEnd => "SESSION_END",
            Event::Interrupted => "SESSION_INTERRUPTED",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::StoreAppend => "STORE_APPEND",
            Event::StoreRewrite => "STORE_REWRITE",
            Event::RecordSkipped => "RECORD_SKIPPED",
            Event::StoreWriteFailed => "STORE_WRITE_FAILED",

            Event::AccountRegistered => "ACCOUNT_REGISTERED",
            Event::LoginSucceeded => "LOGIN_SUCCEEDED",
            Event::LoginFailed => "LOGIN_FAILED",
            Event::AccountLocked => "ACCOUNT_LOCKED",
            Event::Logout => "LOGOUT",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RecordSkipped | Event::LoginFailed | Event::AccountLocked => Severity::Warn,
            Event::StoreWriteFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
