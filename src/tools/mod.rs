//! Record-keeping tools built on the line store
//!
//! Each tool owns one or more [`RecordStore`](crate::store::RecordStore)s and
//! exposes typed operations. Console interaction lives in `cli::menus`.

mod dreams;
mod errors;
mod grades;
mod students;
mod symbols;

pub use dreams::{
    analyze, recall_prompts, Dream, DreamEntry, DreamJournal, IntensityStats, PatternReport,
    DREAM_FIELDS, RECALL_PROMPTS,
};
pub use errors::{ToolError, ToolResult};
pub use grades::{
    summarize_by, GradeBook, GradeEntry, GradeQuery, GradeReport, QueryField, Summary,
    GRADE_FIELDS, REMEDIATION_THRESHOLD,
};
pub use students::{Student, StudentChanges, StudentRegistry, STUDENT_FIELDS};
pub use symbols::{normalize_symbol, SymbolBook, BUILTIN_SYMBOLS, SYMBOL_FIELDS};

use crate::validation::{reject_char, require_non_empty, ValidationResult};

/// Store file names inside the data directory
pub const STUDENTS_FILE: &str = "students.txt";
pub const DREAMS_FILE: &str = "dreams.txt";
pub const SYMBOLS_FILE: &str = "symbols.txt";
pub const GRADES_FILE: &str = "grades.txt";
pub const ACCOUNTS_FILE: &str = "accounts.txt";

/// Result of a confirmed single-record delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    Declined,
    NotFound,
}

/// Non-empty, trimmed, and free of the store delimiter.
pub(crate) fn clean_field(value: &str, field: &str, delimiter: char) -> ValidationResult<String> {
    let trimmed = require_non_empty(value, field)?;
    reject_char(trimmed, delimiter, field)?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_clean_field() {
        assert_eq!(clean_field("  Jane Doe ", "Name", '|').unwrap(), "Jane Doe");
        assert!(matches!(
            clean_field("   ", "Name", '|'),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            clean_field("Jane;Doe", "Name", ';'),
            Err(ValidationError::ReservedCharacter { found: ';', .. })
        ));
    }
}
