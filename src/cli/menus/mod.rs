//! Interactive menu loops, one per tool
//!
//! Each loop reads a short command, dispatches and shows the menu again.
//! Tool errors are printed and the loop carries on; end of input leaves the
//! loop with the tool's goodbye.

pub mod dreams;
pub mod grades;
pub mod students;

use std::fmt::Display;
use std::io::{BufRead, Write};

use super::console::Console;
use super::errors::CliResult;

/// Print `goodbye` once the loop ends normally or at end of input.
pub(crate) fn finish<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    result: CliResult<()>,
    goodbye: &str,
) -> CliResult<()> {
    match result {
        Ok(()) => console.say(goodbye),
        Err(e) if e.is_end_of_input() => {
            console.blank()?;
            console.say(goodbye)
        }
        Err(e) => Err(e),
    }
}

pub(crate) fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    err: impl Display,
) -> CliResult<()> {
    console.say(format!("Error: {}", err))
}
