//! Dream journal menu
//!
//! An account menu (login, register) guards the journal menu. Logging out
//! returns to the account menu.

use std::io::{BufRead, Write};

use super::super::config::Config;
use super::super::console::Console;
use super::super::errors::CliResult;
use super::{finish, report};
use crate::session::{Accounts, Session};
use crate::tools::{
    normalize_symbol, recall_prompts, Deletion, Dream, DreamEntry, DreamJournal, SymbolBook,
    ACCOUNTS_FILE, BUILTIN_SYMBOLS, DREAMS_FILE, SYMBOLS_FILE,
};
use crate::validation::{
    parse_int_in_range, reject_char, validate_date, validate_letters_only, validate_text,
};

const GOODBYE: &str = "Thank you for using Dream Journal & Analysis System! Sweet dreams!";
const PROMPT_COUNT: usize = 5;

struct Journal {
    accounts: Accounts,
    dreams: DreamJournal,
    symbols: SymbolBook,
    delimiter: char,
}

enum Flow {
    Logout,
    Exit,
}

pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, config: &Config) -> CliResult<()> {
    let journal = Journal {
        accounts: Accounts::new(config.store_path(ACCOUNTS_FILE), config.delimiter),
        dreams: DreamJournal::new(config.store_path(DREAMS_FILE), config.delimiter),
        symbols: SymbolBook::new(config.store_path(SYMBOLS_FILE), config.delimiter),
        delimiter: config.delimiter,
    };
    let mut session = Session::new(config.max_login_attempts);

    console.say("\nWelcome to Dream Journal & Analysis System!")?;
    let result = account_loop(console, &journal, &mut session);
    finish(console, result, GOODBYE)
}

fn account_loop<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &mut Session,
) -> CliResult<()> {
    loop {
        console.header("       DREAM JOURNAL & ANALYSIS SYSTEM")?;
        console.say("1. Login")?;
        console.say("2. Register")?;
        console.say("3. Exit")?;
        console.rule('-', 50)?;

        match console.prompt("Enter your choice (1-3): ")?.as_str() {
            "1" => {
                if login(console, journal, session)? {
                    if let Flow::Exit = journal_loop(console, journal, session)? {
                        return Ok(());
                    }
                }
            }
            "2" => register(console, journal)?,
            "3" => return Ok(()),
            _ => console.say("Invalid choice! Please enter a number between 1-3.")?,
        }
    }
}

fn login<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &mut Session,
) -> CliResult<bool> {
    console.say("\n=== LOGIN ===\n")?;
    let username = console.prompt("Username: ")?;
    let password = console.prompt("Password: ")?;

    match journal.accounts.login(session, &username, &password) {
        Ok(()) => {
            console.say(format!("\nWelcome back, {}!", username))?;
            Ok(true)
        }
        Err(e) => {
            report(console, e)?;
            Ok(false)
        }
    }
}

fn register<R: BufRead, W: Write>(console: &mut Console<R, W>, journal: &Journal) -> CliResult<()> {
    console.say("\n=== REGISTER ===\n")?;
    let username = console.prompt("Choose a username (3-20 letters, digits or _): ")?;
    let password = console.prompt("Choose a password (at least 6 characters): ")?;

    match journal.accounts.register(&username, &password) {
        Ok(()) => console.say("\nRegistration successful! You can now log in."),
        Err(e) => report(console, e),
    }
}

fn journal_loop<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &mut Session,
) -> CliResult<Flow> {
    loop {
        console.header("       DREAM JOURNAL & ANALYSIS SYSTEM")?;
        if let Some(operator) = session.operator() {
            console.say(format!("Logged in as: {}", operator))?;
            console.rule('-', 50)?;
        }
        console.say("1. Add New Dream Entry")?;
        console.say("2. View All Dreams")?;
        console.say("3. Search Dreams")?;
        console.say("4. Analyze Dream Patterns")?;
        console.say("5. Get Dream Prompts")?;
        console.say("6. View Symbol Dictionary")?;
        console.say("7. Add Custom Symbol")?;
        console.say("8. Delete Dream Entry")?;
        console.say("9. Logout")?;
        console.say("10. Exit")?;
        console.rule('-', 50)?;

        match console.prompt("Enter your choice (1-10): ")?.as_str() {
            "1" => add_dream(console, journal, session)?,
            "2" => view_dreams(console, journal, session)?,
            "3" => search_dreams(console, journal, session)?,
            "4" => analyze_patterns(console, journal, session)?,
            "5" => dream_prompts(console)?,
            "6" => symbol_dictionary(console, journal)?,
            "7" => add_symbol(console, journal)?,
            "8" => delete_dream(console, journal, session)?,
            "9" => {
                if let Some(operator) = session.logout() {
                    console.say(format!("\nGoodbye, {}! You have been logged out.", operator))?;
                }
                return Ok(Flow::Logout);
            }
            "10" => return Ok(Flow::Exit),
            _ => console.say("Invalid choice! Please enter a number between 1-10.")?,
        }
    }
}

fn add_dream<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &Session,
) -> CliResult<()> {
    console.say("\n=== ADD NEW DREAM ENTRY ===\n")?;
    let delimiter = journal.delimiter;

    let date = console.prompt_valid("Enter date (YYYY-MM-DD) or press Enter for today: ", validate_date)?;
    let title = console.prompt_valid("Dream title: ", |s| validate_text(s, "Title").map(str::to_string))?;
    let description = console.prompt_valid("Describe your dream: ", |s| {
        validate_text(s, "Description").map(str::to_string)
    })?;

    console.say("\nMood options: Happy, Sad, Scared, Confused, Excited, Calm, Anxious")?;
    let mood = console.prompt_valid("How did you feel in the dream? ", |s| {
        validate_letters_only(s, "Mood").map(str::to_string)
    })?;

    console.say("\nDream types: Normal, Nightmare, Lucid, Recurring")?;
    let kind = console.prompt_valid("Dream type: ", |s| {
        validate_letters_only(s, "Dream type").map(str::to_string)
    })?;

    let intensity = console.prompt_valid("Emotional intensity (1-10): ", |s| {
        parse_int_in_range(s, 1, 10, "Intensity").map(|n| n as u8)
    })?;
    let symbols = console.prompt_valid(
        "Symbols or key elements (comma-separated, e.g. water, flying): ",
        |s| reject_char(s, delimiter, "Symbols").map(|_| s.to_string()),
    )?;

    let entry = DreamEntry {
        date,
        title,
        description,
        mood,
        kind,
        intensity,
        symbols,
    };
    match journal.dreams.add(session, entry) {
        Ok(_) => console.say("\nDream entry saved successfully!"),
        Err(e) => report(console, e),
    }
}

fn show_dream<R: BufRead, W: Write>(console: &mut Console<R, W>, number: usize, dream: &Dream) -> CliResult<()> {
    console.say(format!("Dream #{}", number))?;
    console.say(format!("Date: {}", dream.date))?;
    console.say(format!("Title: {}", dream.title))?;
    console.say(format!("Description: {}", dream.description))?;
    console.say(format!("Mood: {}", dream.mood))?;
    console.say(format!("Type: {}", dream.kind))?;
    console.say(format!("Intensity: {}/10", dream.intensity))?;
    if !dream.symbols.is_empty() {
        console.say(format!("Symbols: {}", dream.symbols))?;
    }
    console.rule('-', 50)
}

fn view_dreams<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &Session,
) -> CliResult<()> {
    console.say("\n=== ALL DREAM ENTRIES ===\n")?;
    let dreams = match journal.dreams.dreams(session) {
        Ok(dreams) => dreams,
        Err(e) => return report(console, e),
    };

    if dreams.is_empty() {
        return console.say("No dreams found. Start by adding your first dream!");
    }
    for (index, dream) in dreams.iter().enumerate() {
        show_dream(console, index + 1, dream)?;
    }
    console.say(format!("\nTotal dreams: {}", dreams.len()))
}

fn search_dreams<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &Session,
) -> CliResult<()> {
    console.say("\n=== SEARCH DREAMS ===\n")?;
    let keyword = console.prompt("Enter keyword to search: ")?;

    match journal.dreams.search(session, &keyword) {
        Ok(hits) if hits.is_empty() => console.say(format!("No dreams found matching '{}'", keyword)),
        Ok(hits) => {
            console.say(format!("Found {} dream(s) matching '{}':\n", hits.len(), keyword))?;
            for (number, dream) in &hits {
                show_dream(console, *number, dream)?;
            }
            Ok(())
        }
        Err(e) => report(console, e),
    }
}

fn analyze_patterns<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &Session,
) -> CliResult<()> {
    console.say("\n=== DREAM PATTERN ANALYSIS ===\n")?;
    let report_data = match journal.dreams.analyze(session) {
        Ok(r) => r,
        Err(e) => return report(console, e),
    };

    if report_data.total == 0 {
        return console.say("No dreams to analyze yet.");
    }

    console.say(format!("Total Dreams Recorded: {}\n", report_data.total))?;
    for (title, counts) in [
        ("--- MOOD DISTRIBUTION ---", &report_data.moods),
        ("\n--- DREAM TYPES ---", &report_data.kinds),
        ("\n--- MOST COMMON SYMBOLS ---", &report_data.symbols),
    ] {
        console.say(title)?;
        for (name, count) in counts {
            console.say(format!("{}: {} time(s)", name, count))?;
        }
    }

    if let Some(intensity) = report_data.intensity {
        console.say("\n--- EMOTIONAL INTENSITY ---")?;
        console.say(format!("Average Intensity: {:.1}/10", intensity.average))?;
        console.say(format!("Highest Intensity: {}/10", intensity.highest))?;
        console.say(format!("Lowest Intensity: {}/10", intensity.lowest))?;
    }
    Ok(())
}

fn dream_prompts<R: BufRead, W: Write>(console: &mut Console<R, W>) -> CliResult<()> {
    console.say("\n=== DREAM RECALL PROMPTS ===\n")?;
    console.say("Answer these questions to help remember your dream:\n")?;
    for (index, prompt) in recall_prompts(&mut rand::thread_rng(), PROMPT_COUNT).iter().enumerate() {
        console.say(format!("{}. {}", index + 1, prompt))?;
    }
    console.say("\nUse these prompts to recall more details about your dream!")
}

fn symbol_dictionary<R: BufRead, W: Write>(console: &mut Console<R, W>, journal: &Journal) -> CliResult<()> {
    console.say("\n=== DREAM SYMBOL DICTIONARY ===\n")?;
    console.say("--- COMMON DREAM SYMBOLS ---\n")?;
    for (symbol, meaning) in BUILTIN_SYMBOLS {
        console.say(format!("{}: {}", normalize_symbol(symbol), meaning))?;
    }

    match journal.symbols.custom() {
        Ok(custom) if custom.is_empty() => Ok(()),
        Ok(custom) => {
            console.say("\n--- CUSTOM SYMBOLS ---\n")?;
            for (symbol, meaning) in custom {
                console.say(format!("{}: {}", symbol, meaning))?;
            }
            Ok(())
        }
        Err(e) => report(console, e),
    }
}

fn add_symbol<R: BufRead, W: Write>(console: &mut Console<R, W>, journal: &Journal) -> CliResult<()> {
    console.say("\n=== ADD CUSTOM SYMBOL ===\n")?;
    let symbol = console.prompt("Symbol name: ")?;
    let meaning = console.prompt("Meaning: ")?;

    match journal.symbols.add(&symbol, &meaning) {
        Ok((symbol, _)) => console.say(format!("\nCustom symbol '{}' added successfully!", symbol)),
        Err(e) => report(console, e),
    }
}

fn delete_dream<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    journal: &Journal,
    session: &Session,
) -> CliResult<()> {
    console.say("\n=== DELETE DREAM ENTRY ===\n")?;
    let dreams = match journal.dreams.dreams(session) {
        Ok(dreams) => dreams,
        Err(e) => return report(console, e),
    };
    if dreams.is_empty() {
        return console.say("No dreams to delete.");
    }

    console.say("Your dreams:\n")?;
    for (index, dream) in dreams.iter().enumerate() {
        console.say(format!("{}. {} ({})", index + 1, dream.title, dream.date))?;
    }

    let number = console.prompt_valid(
        "\nEnter the number of the dream to delete (0 to cancel): ",
        |s| s.parse::<usize>().map_err(|_| "Invalid input! Please enter a number."),
    )?;
    if number == 0 {
        return console.say("Deletion cancelled.");
    }

    let outcome = journal.dreams.delete_nth(session, number, |dream| -> CliResult<bool> {
        console.confirm(&format!("Are you sure you want to delete '{}'?", dream.title))
    });
    match console.recover(outcome)? {
        Some(Deletion::Deleted) => console.say("\nDream deleted successfully!"),
        Some(Deletion::Declined) => console.say("Deletion cancelled."),
        Some(Deletion::NotFound) => console.say("Invalid dream number!"),
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
    fn test_register_login_add_view() {
        let dir = TempDir::new().unwrap();
        let out = session(
            &dir,
            "2\nana\nsecret1\n1\nana\nsecret1\n\
             1\n2025-11-01\nSea\nWalking by the sea\nCalm\nNormal\n5\nwater\n\
             2\n10\n",
        );
        assert!(out.contains("Registration successful!"));
        assert!(out.contains("Welcome back, ana!"));
        assert!(out.contains("Dream entry saved successfully!"));
        assert!(out.contains("Title: Sea"));
        assert!(out.contains("Total dreams: 1"));
        assert!(out.ends_with(&format!("{}\n", GOODBYE)));
    }

    #[test]
    fn test_invalid_fields_reprompt() {
        let dir = TempDir::new().unwrap();
        let out = session(
            &dir,
            "2\nana\nsecret1\n1\nana\nsecret1\n\
             1\n2025-02-30\n2025-11-01\nSea|Sky\nSea\nWalk\nCalm1\nCalm\nNormal\n42\n5\n\n\
             10\n",
        );
        assert!(out.contains("Invalid date '2025-02-30'"));
        assert!(out.contains("Title contains invalid character: '|'"));
        assert!(out.contains("Mood can only contain letters!"));
        assert!(out.contains("Intensity must be between 1 and 10!"));
        assert!(out.contains("Dream entry saved successfully!"));
    }

    #[test]
    fn test_wrong_password_locks_after_three() {
        let dir = TempDir::new().unwrap();
        let out = session(
            &dir,
            "2\nana\nsecret1\n1\nana\nx\n1\nana\nx\n1\nana\nx\n1\nana\nsecret1\n3\n",
        );
        assert!(out.contains("Invalid username or password (2 attempt(s) left)"));
        assert!(out.contains("Invalid username or password (1 attempt(s) left)"));
        assert_eq!(out.matches("Login is locked for this session").count(), 2);
        assert!(!out.contains("Welcome back"));
    }

    #[test]
    fn test_delete_reasks_until_valid_answer() {
        let dir = TempDir::new().unwrap();
        let out = session(
            &dir,
            "2\nana\nsecret1\n1\nana\nsecret1\n\
             1\n2025-11-01\nSea\nWalk\nCalm\nNormal\n5\n\n\
             8\nabc\n1\nmaybe\nyes\n\
             2\n9\n3\n",
        );
        assert!(out.contains("Invalid input! Please enter a number."));
        assert!(out.contains("Invalid input! Please type 'y'/'yes'"));
        assert!(out.contains("Dream deleted successfully!"));
        assert!(out.contains("No dreams found."));
        assert!(out.contains("Goodbye, ana! You have been logged out."));
    }
}
