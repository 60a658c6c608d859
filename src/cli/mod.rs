//! CLI module for linestore
//!
//! Provides the command-line interface for:
//! - students: Student information menu
//! - dreams: Dream journal menu with accounts
//! - grades: Grade analyzer menu
//! - check: Report malformed lines in a store file

mod args;
mod commands;
mod config;
mod console;
mod errors;
mod menus;

pub use args::{Cli, Command};
pub use commands::{check, load_config, run, run_command, INTERRUPT_GOODBYE};
pub use config::{validate_delimiter, Config, DEFAULT_CONFIG_PATH};
pub use console::Console;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use menus::{dreams, grades, students};
