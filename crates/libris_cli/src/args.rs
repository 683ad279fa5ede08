use clap::{Parser, Subcommand};
use libris_core::config::DEFAULT_DB_FILE;
use libris_core::BookId;
use std::path::PathBuf;

/// Libris CLI - inspect and edit a libris book store file
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Open a libris database, apply one command, print the listing", long_about = None)]
pub struct Cli {
    /// Persisted record file
    #[arg(env = "LIBRIS_DB", default_value = DEFAULT_DB_FILE)]
    pub db_path: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,

    /// Absolute directory for rolling log files (logging is off when unset)
    #[arg(long = "log-dir", env = "LIBRIS_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long = "log-level", env = "LIBRIS_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print every book (default)
    List,
    /// Add an available book with the next free id
    Add {
        title: String,
        author: String,
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
    /// Check out a book by id
    Checkout { id: BookId },
    /// Return a checked-out book by id
    Return { id: BookId },
}
