//! linestore - Delimited flat-file record keeping
//!
//! One record per line, fields joined by a single delimiter. Reads skip
//! malformed lines instead of failing; rewrites replace the file atomically.
//!
//! - `store`: record codec, reader, writer and rewrite transactions
//! - `validation`: field validators used by the tools
//! - `session`: accounts, password hashing and login lockout
//! - `tools`: student, dream journal and grade book operations
//! - `cli`: configuration, console and interactive menus

pub mod cli;
pub mod observability;
pub mod session;
pub mod store;
pub mod tools;
pub mod validation;
