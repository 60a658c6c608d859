//! # Session Errors

use thiserror::Error;

use crate::store::StoreError;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown user or wrong password (deliberately indistinguishable)
    #[error("Invalid username or password ({remaining} attempt(s) left)")]
    InvalidCredentials { remaining: u32 },

    #[error("Too many failed attempts for '{0}'. Login is locked for this session.")]
    Locked(String),

    #[error("Username '{0}' is already registered")]
    UsernameTaken(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    #[error("You must be logged in")]
    NotLoggedIn,

    #[error("Password hashing failed")]
    HashingFailed,

    #[error(transparent)]
    Store(#[from] StoreError),
}
