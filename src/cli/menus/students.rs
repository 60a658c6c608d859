//! Student information menu

use std::io::{BufRead, Write};

use super::super::config::Config;
use super::super::console::Console;
use super::super::errors::CliResult;
use super::{finish, report};
use crate::tools::{Deletion, Student, StudentChanges, StudentRegistry, STUDENTS_FILE};

const GOODBYE: &str = "Thank you for using Student Information System. Goodbye!";

pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, config: &Config) -> CliResult<()> {
    let registry = StudentRegistry::new(config.store_path(STUDENTS_FILE), config.delimiter);

    console.blank()?;
    console.rule('=', 40)?;
    console.say("Welcome to Student Information System")?;
    console.rule('=', 40)?;

    let result = menu_loop(console, &registry);
    finish(console, result, GOODBYE)
}

fn menu_loop<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    registry: &StudentRegistry,
) -> CliResult<()> {
    loop {
        console.blank()?;
        console.rule('=', 40)?;
        console.say("=== Student Information System ===")?;
        console.rule('=', 40)?;
        console.say("a. Add Student Record")?;
        console.say("b. View All Records")?;
        console.say("c. Search Record")?;
        console.say("d. Update Record")?;
        console.say("e. Delete Record")?;
        console.say("f. End")?;
        console.rule('=', 40)?;

        let choice = console.prompt("Enter your choice (a-f): ")?.to_lowercase();
        match choice.as_str() {
            "a" => add(console, registry)?,
            "b" => view_all(console, registry)?,
            "c" => search(console, registry)?,
            "d" => update(console, registry)?,
            "e" => delete(console, registry)?,
            "f" => return Ok(()),
            _ => console.say("Invalid choice! Please select a-f.")?,
        }
    }
}

fn add<R: BufRead, W: Write>(console: &mut Console<R, W>, registry: &StudentRegistry) -> CliResult<()> {
    console.say("\n--- Add Student Record ---")?;
    let id = console.prompt("Enter Student ID: ")?;
    let name = console.prompt("Enter Name: ")?;
    let course = console.prompt("Enter Course: ")?;
    let year = console.prompt("Enter Year Level: ")?;

    match registry.add(&Student::new(id, name, course, year)) {
        Ok(_) => {
            console.say("\nRecord successfully added!")?;
            console.say("\nCurrent Records:")?;
            list(console, registry)
        }
        Err(e) => report(console, e),
    }
}

fn view_all<R: BufRead, W: Write>(console: &mut Console<R, W>, registry: &StudentRegistry) -> CliResult<()> {
    console.say("\n--- All Student Records ---")?;
    list(console, registry)
}

fn list<R: BufRead, W: Write>(console: &mut Console<R, W>, registry: &StudentRegistry) -> CliResult<()> {
    let students = match registry.all() {
        Ok(students) => students,
        Err(e) => return report(console, e),
    };

    if students.is_empty() {
        return console.say("No records found.");
    }
    for student in &students {
        console.say(student)?;
    }
    console.say(format!("\nTotal Records: {}", students.len()))
}

fn prompt_id<R: BufRead, W: Write>(console: &mut Console<R, W>, label: &str) -> CliResult<Option<String>> {
    let id = console.prompt(label)?;
    if id.is_empty() {
        console.say("Error: Student ID cannot be empty!")?;
        return Ok(None);
    }
    Ok(Some(id))
}

fn search<R: BufRead, W: Write>(console: &mut Console<R, W>, registry: &StudentRegistry) -> CliResult<()> {
    console.say("\n--- Search Record ---")?;
    let Some(id) = prompt_id(console, "Enter Student ID to search: ")? else {
        return Ok(());
    };

    match registry.find(&id) {
        Ok(Some(student)) => {
            console.say("\nRecord Found:")?;
            console.say(student)
        }
        Ok(None) => console.say(format!("No record found with ID: {}", id)),
        Err(e) => report(console, e),
    }
}

fn update<R: BufRead, W: Write>(console: &mut Console<R, W>, registry: &StudentRegistry) -> CliResult<()> {
    console.say("\n--- Update Record ---")?;
    let Some(id) = prompt_id(console, "Enter Student ID to update: ")? else {
        return Ok(());
    };

    let current = match registry.find(&id) {
        Ok(Some(student)) => student,
        Ok(None) => return console.say(format!("No record found with ID: {}", id)),
        Err(e) => return report(console, e),
    };

    console.say("\nCurrent Record:")?;
    console.say(&current)?;
    console.say("\nEnter new information (press Enter to keep current value):")?;
    let name = console.prompt(&format!("Name [{}]: ", current.name))?;
    let course = console.prompt(&format!("Course [{}]: ", current.course))?;
    let year = console.prompt(&format!("Year Level [{}]: ", current.year))?;

    match registry.update(&id, &StudentChanges::from_answers(&name, &course, &year)) {
        Ok(updated) => {
            console.say("\nRecord updated successfully!")?;
            console.say("Updated Record:")?;
            console.say(updated)
        }
        Err(e) => report(console, e),
    }
}

fn delete<R: BufRead, W: Write>(console: &mut Console<R, W>, registry: &StudentRegistry) -> CliResult<()> {
    console.say("\n--- Delete Record ---")?;
    let Some(id) = prompt_id(console, "Enter Student ID to delete: ")? else {
        return Ok(());
    };

    let outcome = registry.delete_confirmed(&id, |student| -> CliResult<bool> {
        console.say("\nRecord to be deleted:")?;
        console.say(student)?;
        console.confirm_lenient("Are you sure you want to delete this record?")
    });

    match console.recover(outcome)? {
        Some(Deletion::Deleted) => console.say("Record deleted successfully!"),
        Some(Deletion::Declined) => console.say("Deletion cancelled."),
        Some(Deletion::NotFound) => console.say(format!("No record found with ID: {}", id)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session(dir: &TempDir, input: &str) -> String {
        let config = Config {
            data_dir: dir.path().display().to_string(),
            ..Config::default()
        };
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        run(&mut console, &config).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_add_then_view() {
        let dir = TempDir::new().unwrap();
        let out = session(&dir, "a\nS001\nJane Doe\nCS\n1\nb\nf\n");
        assert!(out.contains("Record successfully added!"));
        assert!(out.contains("ID: S001 | Name: Jane Doe | Course: CS | Year: 1"));
        assert!(out.contains("Total Records: 1"));
        assert!(out.ends_with(&format!("{}\n", GOODBYE)));
    }

    #[test]
    fn test_invalid_choice_and_eof() {
        let dir = TempDir::new().unwrap();
        let out = session(&dir, "z\n");
        assert!(out.contains("Invalid choice! Please select a-f."));
        assert!(out.ends_with(&format!("{}\n", GOODBYE)));
    }

    #[test]
    fn test_empty_id_is_reported() {
        let dir = TempDir::new().unwrap();
        let out = session(&dir, "c\n\nf\n");
        assert!(out.contains("Error: Student ID cannot be empty!"));
    }

    #[test]
    fn test_delete_unknown_id() {
        let dir = TempDir::new().unwrap();
        let out = session(&dir, "e\nS404\nf\n");
        assert!(out.contains("No record found with ID: S404"));
    }
}
