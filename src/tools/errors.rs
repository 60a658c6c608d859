//! Tool errors
//!
//! Every variant is shown to the operator and the menu carries on.

use thiserror::Error;

use crate::session::SessionError;
use crate::store::StoreError;
use crate::validation::ValidationError;

pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{kind} {key} already exists!")]
    Duplicate { kind: &'static str, key: String },

    #[error("No record found with {kind}: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
