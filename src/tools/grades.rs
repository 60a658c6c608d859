//! Grade book: `student|course|grade`

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use super::clean_field;
use super::errors::ToolResult;
use crate::store::{Record, RecordLayout, RecordStore};
use crate::validation::{parse_grade, require_non_empty};

pub const GRADE_FIELDS: usize = 3;

/// Courses averaging below this need remediation
pub const REMEDIATION_THRESHOLD: f64 = 60.0;

const STUDENT: usize = 0;
const COURSE: usize = 1;
const GRADE: usize = 2;

const TOP_STUDENTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct GradeEntry {
    pub student: String,
    pub course: String,
    pub grade: f64,
}

impl GradeEntry {
    pub fn new(student: impl Into<String>, course: impl Into<String>, grade: f64) -> Self {
        Self {
            student: student.into(),
            course: course.into(),
            grade,
        }
    }

    pub fn to_record(&self) -> Record {
        Record::from([
            self.student.clone(),
            self.course.clone(),
            self.grade.to_string(),
        ])
    }

    /// `None` when the grade field is not a number in `0..=100`
    pub fn from_record(record: &Record) -> Option<Self> {
        if record.arity() != GRADE_FIELDS {
            return None;
        }
        Some(Self {
            student: record.field(STUDENT)?.to_string(),
            course: record.field(COURSE)?.to_string(),
            grade: parse_grade(record.field(GRADE)?).ok()?,
        })
    }
}

impl fmt::Display for GradeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {:.1}", self.student, self.course, self.grade)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

impl Summary {
    fn of(grades: &[f64]) -> Option<Self> {
        if grades.is_empty() {
            return None;
        }
        let highest = grades.iter().copied().fold(f64::MIN, f64::max);
        let lowest = grades.iter().copied().fold(f64::MAX, f64::min);
        Some(Self {
            count: grades.len(),
            average: grades.iter().sum::<f64>() / grades.len() as f64,
            highest,
            lowest,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Avg: {:.2}, High: {:.1}, Low: {:.1}",
            self.average, self.highest, self.lowest
        )
    }
}

/// Group grades by `key` and summarize each group; keys come out sorted.
pub fn summarize_by<F>(entries: &[GradeEntry], key: F) -> BTreeMap<String, Summary>
where
    F: Fn(&GradeEntry) -> &str,
{
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for entry in entries {
        groups.entry(key(entry).to_string()).or_default().push(entry.grade);
    }
    groups
        .into_iter()
        .filter_map(|(name, grades)| Some((name, Summary::of(&grades)?)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradeReport {
    pub total: usize,
    pub per_student: BTreeMap<String, Summary>,
    pub per_course: BTreeMap<String, Summary>,
    /// Best three averages, ties by name
    pub top_students: Vec<(String, f64)>,
    /// Courses averaging below [`REMEDIATION_THRESHOLD`], lowest average first
    pub remediation: Vec<(String, f64)>,
}

impl GradeReport {
    pub fn build(entries: &[GradeEntry]) -> Self {
        let per_student = summarize_by(entries, |e| e.student.as_str());
        let per_course = summarize_by(entries, |e| e.course.as_str());

        let mut top_students: Vec<(String, f64)> = per_student
            .iter()
            .map(|(name, s)| (name.clone(), s.average))
            .collect();
        top_students.sort_by(|a, b| b.1.total_cmp(&a.1));
        top_students.truncate(TOP_STUDENTS);

        let mut remediation: Vec<(String, f64)> = per_course
            .iter()
            .filter(|(_, s)| s.average < REMEDIATION_THRESHOLD)
            .map(|(name, s)| (name.clone(), s.average))
            .collect();
        remediation.sort_by(|a, b| a.1.total_cmp(&b.1));

        Self {
            total: entries.len(),
            per_student,
            per_course,
            top_students,
            remediation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Student,
    Course,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeQuery {
    pub entries: Vec<GradeEntry>,
    /// Keyed by the queried field
    pub summaries: BTreeMap<String, Summary>,
}

pub struct GradeBook {
    store: RecordStore,
}

impl GradeBook {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            store: RecordStore::new(path, RecordLayout::new(GRADE_FIELDS).with_delimiter(delimiter)),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn add(&self, student: &str, course: &str, grade: &str) -> ToolResult<GradeEntry> {
        let delimiter = self.store.layout().delimiter();
        let entry = GradeEntry::new(
            clean_field(student, "Student name", delimiter)?,
            clean_field(course, "Course name", delimiter)?,
            parse_grade(grade)?,
        );
        self.store.append(&entry.to_record())?;
        Ok(entry)
    }

    /// Remove every entry for `student` in `course`, ignoring case.
    pub fn remove(&self, student: &str, course: &str) -> ToolResult<usize> {
        let student = require_non_empty(student, "Student name")?.to_lowercase();
        let course = require_non_empty(course, "Course name")?.to_lowercase();

        Ok(self.store.delete(|r| {
            r.field(STUDENT).map(str::to_lowercase).as_deref() == Some(student.as_str())
                && r.field(COURSE).map(str::to_lowercase).as_deref() == Some(course.as_str())
        })?)
    }

    pub fn entries(&self) -> ToolResult<Vec<GradeEntry>> {
        Ok(self
            .store
            .records()?
            .iter()
            .filter_map(GradeEntry::from_record)
            .collect())
    }

    pub fn report(&self) -> ToolResult<GradeReport> {
        Ok(GradeReport::build(&self.entries()?))
    }

    /// Entries whose student or course contains `term`, ignoring case
    pub fn query(&self, field: QueryField, term: &str) -> ToolResult<GradeQuery> {
        let term = require_non_empty(term, "Search term")?.to_lowercase();
        let key = |e: &GradeEntry| -> String {
            match field {
                QueryField::Student => e.student.clone(),
                QueryField::Course => e.course.clone(),
            }
        };

        let entries: Vec<GradeEntry> = self
            .entries()?
            .into_iter()
            .filter(|e| key(e).to_lowercase().contains(&term))
            .collect();
        let summaries = match field {
            QueryField::Student => summarize_by(&entries, |e| e.student.as_str()),
            QueryField::Course => summarize_by(&entries, |e| e.course.as_str()),
        };

        Ok(GradeQuery { entries, summaries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn book(dir: &TempDir) -> GradeBook {
        GradeBook::new(dir.path().join("grades.txt"), '|')
    }

    fn seeded(dir: &TempDir) -> GradeBook {
        let book = book(dir);
        for (s, c, g) in [
            ("Alice", "Math", "95"),
            ("Alice", "Physics", "88"),
            ("Bob", "Math", "72"),
            ("Bob", "History", "45"),
            ("Carol", "History", "55"),
            ("Dave", "Physics", "91.5"),
        ] {
            book.add(s, c, g).unwrap();
        }
        book
    }

    // =========================================================================
    // Add / Remove
    // =========================================================================

    #[test]
    fn test_add_formats_grade() {
        let dir = TempDir::new().unwrap();
        let book = book(&dir);
        book.add("Alice", "Math", "92").unwrap();
        book.add("Bob", "Math", "87.5").unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("grades.txt")).unwrap(),
            "Alice|Math|92\nBob|Math|87.5\n"
        );
        assert_eq!(book.entries().unwrap()[0].to_string(), "Alice - Math - 92.0");
    }

    #[test]
    fn test_add_rejects_out_of_range() {
        let dir = TempDir::new().unwrap();
        let book = book(&dir);
        assert!(book.add("Alice", "Math", "101").is_err());
        assert!(book.add("Alice", "Math", "abc").is_err());
        assert!(book.add("", "Math", "50").is_err());
        assert!(book.entries().unwrap().is_empty());
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let book = seeded(&dir);
        book.add("Alice", "Math", "80").unwrap();

        assert_eq!(book.remove("alice", "MATH").unwrap(), 2);
        assert_eq!(book.remove("alice", "MATH").unwrap(), 0);
        assert_eq!(book.entries().unwrap().len(), 5);
    }

    #[test]
    fn test_non_numeric_grade_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("grades.txt"), "Alice|Math|ninety\nBob|Math|70\n").unwrap();
        let entries = book(&dir).entries().unwrap();
        assert_eq!(entries, vec![GradeEntry::new("Bob", "Math", 70.0)]);
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    #[test]
    fn test_report() {
        let dir = TempDir::new().unwrap();
        let report = seeded(&dir).report().unwrap();

        assert_eq!(report.total, 6);
        assert_eq!(
            report.per_student.keys().collect::<Vec<_>>(),
            vec!["Alice", "Bob", "Carol", "Dave"]
        );
        let alice = report.per_student["Alice"];
        assert_eq!(alice.count, 2);
        assert!((alice.average - 91.5).abs() < 1e-9);
        assert_eq!(alice.highest, 95.0);
        assert_eq!(alice.lowest, 88.0);

        assert_eq!(
            report.top_students,
            vec![
                ("Alice".to_string(), 91.5),
                ("Dave".to_string(), 91.5),
                ("Bob".to_string(), 58.5)
            ]
        );
        assert_eq!(report.remediation, vec![("History".to_string(), 50.0)]);
    }

    #[test]
    fn test_remediation_lowest_average_first() {
        let entries = vec![
            GradeEntry::new("Ana", "Art", 58.0),
            GradeEntry::new("Ben", "Biology", 90.0),
            GradeEntry::new("Cy", "Chemistry", 41.0),
            GradeEntry::new("Dee", "Drama", 52.5),
        ];
        let report = GradeReport::build(&entries);
        assert_eq!(
            report.remediation,
            vec![
                ("Chemistry".to_string(), 41.0),
                ("Drama".to_string(), 52.5),
                ("Art".to_string(), 58.0)
            ]
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary::of(&[90.0, 85.5]).unwrap();
        assert_eq!(summary.to_string(), "Avg: 87.75, High: 90.0, Low: 85.5");
        assert!(Summary::of(&[]).is_none());
    }

    #[test]
    fn test_query_partial_match() {
        let dir = TempDir::new().unwrap();
        let book = seeded(&dir);

        let by_course = book.query(QueryField::Course, "hist").unwrap();
        assert_eq!(by_course.entries.len(), 2);
        assert_eq!(by_course.summaries.keys().collect::<Vec<_>>(), vec!["History"]);

        let by_student = book.query(QueryField::Student, "O").unwrap();
        assert_eq!(by_student.entries.len(), 3);
        assert_eq!(by_student.summaries.keys().collect::<Vec<_>>(), vec!["Bob", "Carol"]);

        assert!(book.query(QueryField::Student, "zed").unwrap().entries.is_empty());
    }
}
