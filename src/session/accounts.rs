//! # Account Registry
//!
//! Accounts live in their own two-field store: `username|password_hash`.

use std::path::PathBuf;

use super::crypto::{hash_password, verify_password, PasswordPolicy};
use super::errors::{SessionError, SessionResult};
use super::Session;
use crate::observability::{log_event_with_fields, Event};
use crate::store::{Record, RecordLayout, RecordStore};

const USERNAME: usize = 0;
const PASSWORD_HASH: usize = 1;

pub const ACCOUNT_FIELDS: usize = 2;

pub struct Accounts {
    store: RecordStore,
    policy: PasswordPolicy,
}

impl Accounts {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            store: RecordStore::new(path, RecordLayout::new(ACCOUNT_FIELDS).with_delimiter(delimiter)),
            policy: PasswordPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn exists(&self, username: &str) -> SessionResult<bool> {
        Ok(self.store.contains(|r| r.field(USERNAME) == Some(username))?)
    }

    /// Register a new account. The password is stored as an Argon2id hash.
    pub fn register(&self, username: &str, password: &str) -> SessionResult<()> {
        validate_username(username)?;
        self.policy.validate(password)?;

        if self.exists(username)? {
            return Err(SessionError::UsernameTaken(username.to_string()));
        }

        let hash = hash_password(password)?;
        self.store.append(&Record::from([username, hash.as_str()]))?;
        log_event_with_fields(Event::AccountRegistered, &[("username", username)]);
        Ok(())
    }

    /// Check credentials and update `session`.
    ///
    /// A locked username is refused before the password is looked at.
    pub fn login(&self, session: &mut Session, username: &str, password: &str) -> SessionResult<()> {
        if session.is_locked(username) {
            return Err(SessionError::Locked(username.to_string()));
        }

        let stored = self.store.find_first(|r| r.field(USERNAME) == Some(username))?;
        let verified = stored
            .as_ref()
            .and_then(|r| r.field(PASSWORD_HASH))
            .map(|hash| verify_password(password, hash))
            .unwrap_or(false);

        if verified {
            session.record_success(username);
            log_event_with_fields(Event::LoginSucceeded, &[("username", username)]);
            return Ok(());
        }

        let failures = session.record_failure(username).to_string();
        log_event_with_fields(
            Event::LoginFailed,
            &[("attempts", failures.as_str()), ("username", username)],
        );

        if session.is_locked(username) {
            log_event_with_fields(Event::AccountLocked, &[("username", username)]);
            return Err(SessionError::Locked(username.to_string()));
        }
        Err(SessionError::InvalidCredentials {
            remaining: session.remaining_attempts(username),
        })
    }
}

/// 3 to 20 ASCII letters, digits or `_`.
pub fn validate_username(username: &str) -> SessionResult<()> {
    let length = username.chars().count();
    if !(3..=20).contains(&length) {
        return Err(SessionError::InvalidUsername(
            "must be 3 to 20 characters".to_string(),
        ));
    }
    if let Some(c) = username
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(SessionError::InvalidUsername(format!(
            "'{}' is not allowed; use letters, digits or '_'",
            c
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn accounts(dir: &TempDir) -> Accounts {
        Accounts::new(dir.path().join("accounts.txt"), '|')
    }

    #[test]
    fn test_register_then_login() {
        let dir = TempDir::new().unwrap();
        let accounts = accounts(&dir);
        accounts.register("dreamer", "moonlight").unwrap();

        let mut session = Session::new(3);
        accounts.login(&mut session, "dreamer", "moonlight").unwrap();
        assert_eq!(session.operator(), Some("dreamer"));
    }

    #[test]
    fn test_password_is_not_stored_in_clear() {
        let dir = TempDir::new().unwrap();
        let accounts = accounts(&dir);
        accounts.register("dreamer", "moonlight").unwrap();

        let contents = std::fs::read_to_string(accounts.store().path()).unwrap();
        assert!(contents.starts_with("dreamer|$argon2"));
        assert!(!contents.contains("moonlight"));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let dir = TempDir::new().unwrap();
        let accounts = accounts(&dir);
        accounts.register("dreamer", "moonlight").unwrap();
        assert!(matches!(
            accounts.register("dreamer", "another1"),
            Err(SessionError::UsernameTaken(_))
        ));
    }

    #[test]
    fn test_invalid_username_and_password() {
        let dir = TempDir::new().unwrap();
        let accounts = accounts(&dir);
        assert!(matches!(
            accounts.register("a|b", "moonlight"),
            Err(SessionError::InvalidUsername(_))
        ));
        assert!(matches!(
            accounts.register("ab", "moonlight"),
            Err(SessionError::InvalidUsername(_))
        ));
        assert!(matches!(
            accounts.register("dreamer", "123"),
            Err(SessionError::WeakPassword(_))
        ));
        assert!(!accounts.store().path().exists());
    }

    #[test]
    fn test_lockout_after_max_attempts() {
        let dir = TempDir::new().unwrap();
        let accounts = accounts(&dir);
        accounts.register("dreamer", "moonlight").unwrap();
        let mut session = Session::new(3);

        assert!(matches!(
            accounts.login(&mut session, "dreamer", "wrong"),
            Err(SessionError::InvalidCredentials { remaining: 2 })
        ));
        assert!(matches!(
            accounts.login(&mut session, "dreamer", "wrong"),
            Err(SessionError::InvalidCredentials { remaining: 1 })
        ));
        assert!(matches!(
            accounts.login(&mut session, "dreamer", "wrong"),
            Err(SessionError::Locked(_))
        ));
        // Correct password no longer helps
        assert!(matches!(
            accounts.login(&mut session, "dreamer", "moonlight"),
            Err(SessionError::Locked(_))
        ));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_success_resets_attempts() {
        let dir = TempDir::new().unwrap();
        let accounts = accounts(&dir);
        accounts.register("dreamer", "moonlight").unwrap();
        let mut session = Session::new(3);

        let _ = accounts.login(&mut session, "dreamer", "wrong");
        let _ = accounts.login(&mut session, "dreamer", "wrong");
        accounts.login(&mut session, "dreamer", "moonlight").unwrap();
        assert_eq!(session.failed_attempts("dreamer"), 0);
    }

    #[test]
    fn test_unknown_user_counts_as_failure() {
        let dir = TempDir::new().unwrap();
        let accounts = accounts(&dir);
        let mut session = Session::new(2);

        assert!(matches!(
            accounts.login(&mut session, "ghost", "whatever"),
            Err(SessionError::InvalidCredentials { remaining: 1 })
        ));
        assert_eq!(session.failed_attempts("ghost"), 1);
    }
}
