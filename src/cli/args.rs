//! CLI argument definitions using clap
//!
//! Commands:
//! - linestore students
//! - linestore dreams
//! - linestore grades
//! - linestore check <file> --fields <n>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// linestore - Delimited flat-file record keeping
#[derive(Parser, Debug)]
#[command(name = "linestore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: ./linestore.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the store files; overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Student information menu
    Students,

    /// Dream journal menu (login required)
    Dreams,

    /// Course enrollment and grade analyzer menu
    Grades,

    /// Report skipped lines in a store file and exit
    Check {
        /// Store file to read
        file: PathBuf,

        /// Expected number of fields per line
        #[arg(long)]
        fields: usize,

        /// Field delimiter (default: from config)
        #[arg(long)]
        delimiter: Option<char>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
