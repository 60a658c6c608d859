//! Course enrollment & grade analyzer menu

use std::io::{BufRead, Write};

use super::super::config::Config;
use super::super::console::Console;
use super::super::errors::CliResult;
use super::{finish, report};
use crate::tools::{GradeBook, GradeEntry, QueryField, GRADES_FILE};
use crate::validation::parse_grade;

const GOODBYE: &str = "Thank you for using the Grade Analyzer. Goodbye!";

pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, config: &Config) -> CliResult<()> {
    let book = GradeBook::new(config.store_path(GRADES_FILE), config.delimiter);

    console.say("Welcome to the Course Enrollment & Grade Analyzer!")?;
    match book.entries() {
        Ok(entries) => console.say(format!("Loaded {} record(s).", entries.len()))?,
        Err(e) => report(console, e)?,
    }

    let result = menu_loop(console, &book);
    finish(console, result, GOODBYE)
}

fn menu_loop<R: BufRead, W: Write>(console: &mut Console<R, W>, book: &GradeBook) -> CliResult<()> {
    loop {
        console.header("COURSE ENROLLMENT & GRADE ANALYZER")?;
        console.say("A - Add record")?;
        console.say("R - Remove record")?;
        console.say("L - List all records")?;
        console.say("S - Show statistics")?;
        console.say("Q - Query by student or course")?;
        console.say("E - Exit")?;
        console.rule('=', 50)?;

        let choice = console.prompt("Enter your choice: ")?.to_uppercase();
        match choice.as_str() {
            "A" => add(console, book)?,
            "R" => remove(console, book)?,
            "L" => list(console, book)?,
            "S" => statistics(console, book)?,
            "Q" => query(console, book)?,
            "E" => return Ok(()),
            _ => console.say("Invalid choice. Please try again.")?,
        }
    }
}

fn add<R: BufRead, W: Write>(console: &mut Console<R, W>, book: &GradeBook) -> CliResult<()> {
    console.say("\n--- ADD RECORD ---")?;
    let student = console.prompt("Enter student name: ")?;
    let course = console.prompt("Enter course name: ")?;
    let grade = console.prompt_valid("Enter grade (0-100): ", parse_grade)?;

    match book.add(&student, &course, &grade.to_string()) {
        Ok(entry) => console.say(format!("Record added: {}", entry)),
        Err(e) => report(console, e),
    }
}

fn remove<R: BufRead, W: Write>(console: &mut Console<R, W>, book: &GradeBook) -> CliResult<()> {
    console.say("\n--- REMOVE RECORD ---")?;
    let student = console.prompt("Enter student name: ")?;
    let course = console.prompt("Enter course name: ")?;

    match book.remove(&student, &course) {
        Ok(0) => console.say("No matching record found."),
        Ok(count) => console.say(format!("Removed {} record(s).", count)),
        Err(e) => report(console, e),
    }
}

fn numbered<R: BufRead, W: Write>(console: &mut Console<R, W>, entries: &[GradeEntry]) -> CliResult<()> {
    for (index, entry) in entries.iter().enumerate() {
        console.say(format!("{}. {}", index + 1, entry))?;
    }
    Ok(())
}

fn list<R: BufRead, W: Write>(console: &mut Console<R, W>, book: &GradeBook) -> CliResult<()> {
    console.say("\n--- ALL RECORDS ---")?;
    match book.entries() {
        Ok(entries) if entries.is_empty() => console.say("No records available."),
        Ok(entries) => numbered(console, &entries),
        Err(e) => report(console, e),
    }
}

fn statistics<R: BufRead, W: Write>(console: &mut Console<R, W>, book: &GradeBook) -> CliResult<()> {
    console.say("\n--- STATISTICS ---")?;
    let stats = match book.report() {
        Ok(stats) => stats,
        Err(e) => return report(console, e),
    };
    if stats.total == 0 {
        return console.say("No records available.");
    }

    console.say(format!("\nTotal records: {}", stats.total))?;
    let students: Vec<&str> = stats.per_student.keys().map(String::as_str).collect();
    console.say(format!("\nUnique students ({}): {}", students.len(), students.join(", ")))?;
    let courses: Vec<&str> = stats.per_course.keys().map(String::as_str).collect();
    console.say(format!("\nUnique courses ({}): {}", courses.len(), courses.join(", ")))?;

    console.say("\n--- STUDENT STATISTICS ---")?;
    for (student, summary) in &stats.per_student {
        console.say(format!("{} - {}", student, summary))?;
    }

    console.say("\n--- COURSE STATISTICS ---")?;
    for (course, summary) in &stats.per_course {
        console.say(format!("{} - {}", course, summary))?;
    }

    console.say("\n--- TOP 3 STUDENTS ---")?;
    for (index, (student, average)) in stats.top_students.iter().enumerate() {
        console.say(format!("{}. {} - {:.2}", index + 1, student, average))?;
    }

    console.say("\n--- COURSES NEEDING REMEDIATION (Avg < 60) ---")?;
    if stats.remediation.is_empty() {
        return console.say("No courses need remediation.");
    }
    for (course, average) in &stats.remediation {
        console.say(format!("{} - Avg: {:.2}", course, average))?;
    }
    Ok(())
}

fn query<R: BufRead, W: Write>(console: &mut Console<R, W>, book: &GradeBook) -> CliResult<()> {
    console.say("\n--- QUERY ---")?;
    console.say("1 - Search by student name")?;
    console.say("2 - Search by course name")?;

    let (field, label) = match console.prompt("Enter choice: ")?.as_str() {
        "1" => (QueryField::Student, "STUDENTS"),
        "2" => (QueryField::Course, "COURSES"),
        _ => return console.say("Invalid choice."),
    };
    let term = console.prompt("Enter search term: ")?;

    let result = match book.query(field, &term) {
        Ok(result) => result,
        Err(e) => return report(console, e),
    };
    if result.entries.is_empty() {
        return console.say(format!("No matching {} found.", label.to_lowercase()));
    }

    console.say(format!("\n--- RECORDS FOR {} MATCHING '{}' ---", label, term))?;
    numbered(console, &result.entries)?;

    console.say("\n--- STATISTICS ---")?;
    for (name, summary) in &result.summaries {
        console.say(format!("{} - {}", name, summary))?;
        if field == QueryField::Course {
            console.say(format!("  Students enrolled: {}", summary.count))?;
        }
    }
    Ok(())
}
