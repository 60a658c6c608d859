//! Field validators applied by the tools before a record is built
//!
//! The store itself only refuses content that would break the line format.
//! Everything about what a *valid* name, date or grade looks like lives here.

mod errors;

pub use errors::{ValidationError, ValidationResult};

use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

/// Year range accepted for journal dates
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Punctuation accepted by [`validate_text`] besides letters, digits and space
pub const TEXT_PUNCTUATION: &str = ".,!?'-:;()&";

fn text_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9 .,!?'\-:;()&]+$").ok())
        .as_ref()
}

fn is_text_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || TEXT_PUNCTUATION.contains(c)
}

/// Reject empty or whitespace-only input. Returns the trimmed value.
pub fn require_non_empty<'a>(value: &'a str, field: &str) -> ValidationResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(trimmed)
}

/// Letters, digits, spaces and basic punctuation only.
pub fn validate_text<'a>(value: &'a str, field: &str) -> ValidationResult<&'a str> {
    let trimmed = require_non_empty(value, field)?;
    let accepted = match text_pattern() {
        Some(pattern) => pattern.is_match(trimmed),
        None => trimmed.chars().all(is_text_char),
    };
    if accepted {
        return Ok(trimmed);
    }

    let found = trimmed.chars().find(|c| !is_text_char(*c)).unwrap_or('?');
    Err(ValidationError::InvalidCharacter {
        field: field.to_string(),
        found,
    })
}

/// Alphabetic characters and whitespace only.
pub fn validate_letters_only<'a>(value: &'a str, field: &str) -> ValidationResult<&'a str> {
    let trimmed = require_non_empty(value, field)?;
    match trimmed.chars().find(|c| !(c.is_alphabetic() || c.is_whitespace())) {
        Some(found) => Err(ValidationError::LettersOnly {
            field: field.to_string(),
            found,
        }),
        None => Ok(trimmed),
    }
}

/// Refuse a character that would be mangled by the store.
pub fn reject_char(value: &str, reserved: char, field: &str) -> ValidationResult<()> {
    if value.contains(reserved) {
        return Err(ValidationError::ReservedCharacter {
            field: field.to_string(),
            found: reserved,
        });
    }
    Ok(())
}

/// Integer within `[min, max]`.
pub fn parse_int_in_range(value: &str, min: i64, max: i64, field: &str) -> ValidationResult<i64> {
    let number: i64 = value.trim().parse().map_err(|_| ValidationError::NotANumber {
        field: field.to_string(),
    })?;
    if number < min || number > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(number)
}

/// Grade between 0 and 100 inclusive.
pub fn parse_grade(value: &str) -> ValidationResult<f64> {
    let field = "Grade";
    let grade: f64 = value.trim().parse().map_err(|_| ValidationError::NotANumber {
        field: field.to_string(),
    })?;
    if !grade.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
        });
    }
    if !(0.0..=100.0).contains(&grade) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }
    Ok(grade)
}

/// `YYYY-MM-DD`, a real calendar date, year within [`MIN_YEAR`]..=[`MAX_YEAR`].
///
/// Empty input means today.
pub fn validate_date(value: &str) -> ValidationResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Local::now().date_naive());
    }

    let shaped = trimmed.len() == 10
        && trimmed.as_bytes()[4] == b'-'
        && trimmed.as_bytes()[7] == b'-';
    let date = shaped
        .then(|| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok())
        .flatten()
        .filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()));

    date.ok_or_else(|| ValidationError::InvalidDate(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty_trims() {
        assert_eq!(require_non_empty("  S001 ", "Student ID"), Ok("S001"));
        assert_eq!(
            require_non_empty("   ", "Student ID"),
            Err(ValidationError::Empty {
                field: "Student ID".to_string()
            })
        );
    }

    #[test]
    fn test_validate_text_allows_basic_punctuation() {
        assert!(validate_text("Flying over a city, then falling!", "Title").is_ok());
        assert!(validate_text("Me & my dog (again): 'lost'?", "Title").is_ok());
    }

    #[test]
    fn test_validate_text_reports_offending_char() {
        let err = validate_text("pipes|break", "Description").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCharacter {
                field: "Description".to_string(),
                found: '|'
            }
        );
        assert!(err.to_string().contains("'|'"));
        assert!(validate_text("café", "Title").is_err());
    }

    #[test]
    fn test_text_pattern_agrees_with_char_scan() {
        let pattern = text_pattern().unwrap();
        for sample in ["plain words", "a-b: c; (d) & e", "x*y", "a/b", "1+1", "tab\there", "ok."] {
            assert_eq!(
                pattern.is_match(sample),
                sample.chars().all(is_text_char),
                "disagreement on {:?}",
                sample
            );
        }
    }

    #[test]
    fn test_letters_only() {
        assert_eq!(validate_letters_only(" Happy ", "Mood"), Ok("Happy"));
        assert!(validate_letters_only("Very Calm", "Mood").is_ok());
        let err = validate_letters_only("Happy1", "Mood").unwrap_err();
        assert!(err.to_string().contains("'1'"));
    }

    #[test]
    fn test_int_range() {
        assert_eq!(parse_int_in_range("7", 1, 10, "Intensity"), Ok(7));
        assert!(matches!(
            parse_int_in_range("11", 1, 10, "Intensity"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_int_in_range("seven", 1, 10, "Intensity"),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_grade_range() {
        assert_eq!(parse_grade("87.5"), Ok(87.5));
        assert_eq!(parse_grade("0"), Ok(0.0));
        assert_eq!(parse_grade("100"), Ok(100.0));
        assert!(parse_grade("100.1").is_err());
        assert!(parse_grade("-1").is_err());
        assert!(parse_grade("NaN").is_err());
        assert!(parse_grade("abc").is_err());
    }

    #[test]
    fn test_date_accepts_real_dates() {
        assert_eq!(
            validate_date("2025-11-01"),
            Ok(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap())
        );
        assert!(validate_date("2024-02-29").is_ok());
    }

    #[test]
    fn test_date_rejects_bad_input() {
        for bad in ["2025-02-30", "2023-02-29", "1899-12-31", "2101-01-01", "2025/11/01", "2025-1-01", "yesterday"] {
            assert!(validate_date(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_empty_date_is_today() {
        assert_eq!(validate_date("").unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_reject_char() {
        assert!(reject_char("water, fire", '|', "Symbols").is_ok());
        assert!(reject_char("water|fire", '|', "Symbols").is_err());
    }
}
