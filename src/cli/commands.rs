//! Command implementations
//!
//! Startup order for every command:
//! 1. Resolve configuration (file, then `--data-dir`)
//! 2. Apply the log threshold
//! 3. Dispatch
//!
//! Interactive commands also prepare the data directory and install the
//! Ctrl-C handler before the first prompt.

use std::io::{StdinLock, Stdout, Write};
use std::path::Path;

use super::args::{Cli, Command};
use super::config::{validate_delimiter, Config};
use super::console::Console;
use super::errors::{CliError, CliResult};
use super::menus;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::store::{RecordLayout, RecordStore};

pub const INTERRUPT_GOODBYE: &str = "\n\nProgram interrupted. Goodbye!";

type StdConsole = Console<StdinLock<'static>, Stdout>;

/// Main entry point; returns the process exit code
pub fn run() -> CliResult<i32> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<i32> {
    let config = load_config(cli.config.as_deref(), cli.data_dir.as_deref())?;
    Logger::set_threshold(config.severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("data_dir", config.data_dir.as_str()),
            ("delimiter", config.delimiter.to_string().as_str()),
        ],
    );

    match cli.command {
        Command::Students => interactive("students", &config, menus::students::run),
        Command::Dreams => interactive("dreams", &config, menus::dreams::run),
        Command::Grades => interactive("grades", &config, menus::grades::run),
        Command::Check {
            file,
            fields,
            delimiter,
        } => {
            let delimiter = delimiter.unwrap_or(config.delimiter);
            check(&file, fields, delimiter, &mut std::io::stdout())
        }
    }
}

/// Resolve the configuration and apply the `--data-dir` override
pub fn load_config(explicit: Option<&Path>, data_dir: Option<&Path>) -> CliResult<Config> {
    let mut config = Config::resolve(explicit)?;
    if let Some(dir) = data_dir {
        config.data_dir = dir.display().to_string();
        config.validate()?;
    }
    Ok(config)
}

fn interactive<F>(tool: &str, config: &Config, menu: F) -> CliResult<i32>
where
    F: FnOnce(&mut StdConsole, &Config) -> CliResult<()>,
{
    config.prepare_data_dir()?;
    install_interrupt_handler();

    log_event_with_fields(Event::SessionStart, &[("tool", tool)]);
    let mut console = Console::stdio();
    menu(&mut console, config)?;
    log_event_with_fields(Event::SessionEnd, &[("tool", tool)]);
    Ok(0)
}

fn install_interrupt_handler() {
    let installed = ctrlc::set_handler(|| {
        log_event(Event::Interrupted);
        println!("{}", INTERRUPT_GOODBYE);
        std::process::exit(0);
    });

    if let Err(e) = installed {
        Logger::warn("INTERRUPT_HANDLER_UNAVAILABLE", &[("reason", e.to_string().as_str())]);
    }
}

/// Report well-formed and skipped lines of one store file.
///
/// Returns exit code 0 when every line parsed, 1 otherwise. A missing file
/// has no lines and is clean.
pub fn check<W: Write>(file: &Path, fields: usize, delimiter: char, out: &mut W) -> CliResult<i32> {
    if fields == 0 {
        return Err(CliError::config_error("--fields must be at least 1"));
    }
    validate_delimiter(delimiter)?;

    let store = RecordStore::new(file, RecordLayout::new(fields).with_delimiter(delimiter));
    let outcome = store.read_all()?;

    writeln!(
        out,
        "{}: {} record(s), {} skipped line(s)",
        file.display(),
        outcome.records.len(),
        outcome.skipped.len()
    )?;
    for skipped in &outcome.skipped {
        writeln!(
            out,
            "  line {}: {}: {}",
            skipped.line_number,
            skipped.fault,
            skipped.raw_lossy()
        )?;
    }

    Ok(if outcome.is_clean() { 0 } else { 1 })
}
