//! Student records: `id|name|course|year`

use std::fmt;
use std::path::PathBuf;

use super::errors::{ToolError, ToolResult};
use super::{clean_field, Deletion};
use crate::store::{Record, RecordLayout, RecordStore, StoreError};

pub const STUDENT_FIELDS: usize = 4;

const ID: usize = 0;
const NAME: usize = 1;
const COURSE: usize = 2;
const YEAR: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub course: String,
    pub year: String,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        course: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            course: course.into(),
            year: year.into(),
        }
    }

    pub fn to_record(&self) -> Record {
        Record::from([
            self.id.as_str(),
            self.name.as_str(),
            self.course.as_str(),
            self.year.as_str(),
        ])
    }

    /// `None` unless the record has exactly four fields
    pub fn from_record(record: &Record) -> Option<Self> {
        if record.arity() != STUDENT_FIELDS {
            return None;
        }
        Some(Self::new(
            record.field(ID)?,
            record.field(NAME)?,
            record.field(COURSE)?,
            record.field(YEAR)?,
        ))
    }

    fn cleaned(&self, delimiter: char) -> ToolResult<Self> {
        Ok(Self {
            id: clean_field(&self.id, "Student ID", delimiter)?,
            name: clean_field(&self.name, "Name", delimiter)?,
            course: clean_field(&self.course, "Course", delimiter)?,
            year: clean_field(&self.year, "Year Level", delimiter)?,
        })
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Course: {} | Year: {}",
            self.id, self.name, self.course, self.year
        )
    }
}

/// Replacement values for an update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
}

impl StudentChanges {
    /// Blank answers mean "keep"
    pub fn from_answers(name: &str, course: &str, year: &str) -> Self {
        fn keep_if_blank(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Self {
            name: keep_if_blank(name),
            course: keep_if_blank(course),
            year: keep_if_blank(year),
        }
    }

    fn apply(&self, current: &Student) -> Student {
        Student {
            id: current.id.clone(),
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            course: self.course.clone().unwrap_or_else(|| current.course.clone()),
            year: self.year.clone().unwrap_or_else(|| current.year.clone()),
        }
    }
}

pub struct StudentRegistry {
    store: RecordStore,
}

impl StudentRegistry {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            store: RecordStore::new(path, RecordLayout::new(STUDENT_FIELDS).with_delimiter(delimiter)),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    fn delimiter(&self) -> char {
        self.store.layout().delimiter()
    }

    /// Add a student. All fields are required and the ID must be unused.
    pub fn add(&self, student: &Student) -> ToolResult<Student> {
        let student = student.cleaned(self.delimiter())?;

        if self.store.contains(|r| r.field(ID) == Some(student.id.as_str()))? {
            return Err(ToolError::Duplicate {
                kind: "Student ID",
                key: student.id,
            });
        }

        self.store.append(&student.to_record())?;
        Ok(student)
    }

    pub fn all(&self) -> ToolResult<Vec<Student>> {
        Ok(self
            .store
            .records()?
            .iter()
            .filter_map(Student::from_record)
            .collect())
    }

    /// Exact ID match
    pub fn find(&self, id: &str) -> ToolResult<Option<Student>> {
        let id = id.trim();
        Ok(self
            .store
            .find_first(|r| r.field(ID) == Some(id))?
            .as_ref()
            .and_then(Student::from_record))
    }

    /// Apply `changes` to the student with `id`; the ID itself never changes.
    pub fn update(&self, id: &str, changes: &StudentChanges) -> ToolResult<Student> {
        let id = id.trim();
        let delimiter = self.delimiter();
        for (value, field) in [
            (&changes.name, "Name"),
            (&changes.course, "Course"),
            (&changes.year, "Year Level"),
        ] {
            if let Some(value) = value {
                clean_field(value, field, delimiter)?;
            }
        }

        let mut txn = self.store.begin()?;
        let current = txn
            .records()
            .find(|r| r.field(ID) == Some(id))
            .and_then(Student::from_record)
            .ok_or_else(|| ToolError::NotFound {
                kind: "ID",
                key: id.to_string(),
            })?;

        txn.update(
            |r| r.field(ID) == Some(id),
            |r| match Student::from_record(r) {
                Some(stored) => changes.apply(&stored).to_record(),
                None => r.clone(),
            },
        )?;
        txn.commit()?;

        Ok(changes.apply(&current))
    }

    /// Delete the student with `id` if `confirm` approves.
    pub fn delete_confirmed<C, E>(&self, id: &str, mut confirm: C) -> Result<Deletion, E>
    where
        C: FnMut(&Student) -> Result<bool, E>,
        E: From<StoreError>,
    {
        let id = id.trim();
        let mut matched = false;
        let removed = self.store.delete_confirmed(
            |r| r.field(ID) == Some(id),
            |r| {
                matched = true;
                match Student::from_record(r) {
                    Some(student) => confirm(&student),
                    None => Ok(false),
                }
            },
        )?;

        Ok(match (matched, removed) {
            (false, _) => Deletion::NotFound,
            (true, 0) => Deletion::Declined,
            _ => Deletion::Deleted,
        })
    }
}
