//! Session context and accounts
//!
//! A [`Session`] is created by the menu loop and passed by reference into
//! every operation that needs to know who is logged in. Nothing about the
//! operator or failed logins is kept in globals.

mod accounts;
mod crypto;
mod errors;

pub use accounts::{validate_username, Accounts, ACCOUNT_FIELDS};
pub use crypto::{hash_password, verify_password, PasswordPolicy};
pub use errors::{SessionError, SessionResult};

use std::collections::HashMap;

use crate::observability::{log_event_with_fields, Event};

/// Default failed logins allowed per username before it is locked
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct Session {
    operator: Option<String>,
    failed: HashMap<String, u32>,
    max_attempts: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOGIN_ATTEMPTS)
    }
}

impl Session {
    /// `max_attempts` below 1 is treated as 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            operator: None,
            failed: HashMap::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.operator.is_some()
    }

    /// The logged-in operator, or `NotLoggedIn`
    pub fn require_operator(&self) -> SessionResult<&str> {
        self.operator().ok_or(SessionError::NotLoggedIn)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn failed_attempts(&self, username: &str) -> u32 {
        self.failed.get(username).copied().unwrap_or(0)
    }

    pub fn remaining_attempts(&self, username: &str) -> u32 {
        self.max_attempts.saturating_sub(self.failed_attempts(username))
    }

    pub fn is_locked(&self, username: &str) -> bool {
        self.failed_attempts(username) >= self.max_attempts
    }

    /// Clears the operator. Returns who was logged in.
    pub fn logout(&mut self) -> Option<String> {
        let previous = self.operator.take();
        if let Some(ref username) = previous {
            log_event_with_fields(Event::Logout, &[("username", username.as_str())]);
        }
        previous
    }

    fn record_success(&mut self, username: &str) {
        self.failed.remove(username);
        self.operator = Some(username.to_string());
    }

    fn record_failure(&mut self, username: &str) -> u32 {
        let count = self.failed.entry(username.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }
}
