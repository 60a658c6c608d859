//! linestore CLI entry point
//!
//! Parses arguments, dispatches, prints errors to stderr and sets the exit
//! code. All logic is delegated to the CLI module.

use linestore::cli;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
