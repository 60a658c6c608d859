//! Line-oriented console I/O
//!
//! Generic over the input and output streams so menus can be driven from a
//! `Cursor` in tests. Every prompt flushes before reading. End of input is
//! reported as [`CliError::end_of_input`].

use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use super::errors::{CliError, CliResult};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line
    pub fn say(&mut self, text: impl Display) -> CliResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn blank(&mut self) -> CliResult<()> {
        writeln!(self.output)?;
        Ok(())
    }

    /// A horizontal rule of `width` copies of `ch`
    pub fn rule(&mut self, ch: char, width: usize) -> CliResult<()> {
        let line: String = std::iter::repeat(ch).take(width).collect();
        self.say(line)
    }

    /// Section title framed by rules
    pub fn header(&mut self, title: &str) -> CliResult<()> {
        self.blank()?;
        self.rule('=', 50)?;
        self.say(title)?;
        self.rule('=', 50)
    }

    /// Show `label`, read one line, return it trimmed
    pub fn prompt(&mut self, label: &str) -> CliResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Err(CliError::end_of_input());
        }
        Ok(line.trim().to_string())
    }

    /// Re-prompt until `parse` accepts the input, printing each rejection
    pub fn prompt_valid<T, E, F>(&mut self, label: &str, mut parse: F) -> CliResult<T>
    where
        F: FnMut(&str) -> Result<T, E>,
        E: Display,
    {
        loop {
            let answer = self.prompt(label)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => self.say(format!("Error: {}", e))?,
            }
        }
    }

    /// Strict yes/no: re-asks until the answer is y/yes or n/no
    pub fn confirm(&mut self, question: &str) -> CliResult<bool> {
        loop {
            let answer = self.prompt(&format!("{} (y/yes or n/no): ", question))?;
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Invalid input! Please type 'y'/'yes' to confirm or 'n'/'no' to cancel.")?,
            }
        }
    }

    /// Lenient yes/no: only y/yes confirms, anything else declines
    pub fn confirm_lenient(&mut self, question: &str) -> CliResult<bool> {
        let answer = self.prompt(&format!("{} (yes/no): ", question))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    /// Report a store failure and carry on; anything else propagates
    pub fn recover<T>(&mut self, result: CliResult<T>) -> CliResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                self.say(format!("Error: {}", e.message()))?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
