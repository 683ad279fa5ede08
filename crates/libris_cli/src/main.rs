//! Command-line front end for `libris_core`.
//!
//! # Responsibility
//! - Open a library file, optionally apply one command, print the listing.
//! - Exercise the controller lifecycle end to end (open, autosave, final save).

mod args;

use args::{Cli, Command};
use clap::Parser;
use libris_core::{
    core_version, default_log_level, init_logging, Book, Library, LibraryConfig, LibraryResult,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().as_str().to_string());
        if let Err(err) = init_logging(&level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> LibraryResult<()> {
    let library = Library::open(LibraryConfig::new(&cli.db_path))?;

    match cli.command.unwrap_or(Command::List) {
        Command::List => {}
        Command::Add {
            title,
            author,
            year,
        } => {
            let handle = library.add_book(title, author, year)?;
            eprintln!("added book {}", handle.id());
        }
        Command::Checkout { id } => library.check_out(id)?,
        Command::Return { id } => library.return_book(id)?,
    }

    let books: Vec<Book> = library.all().iter().map(|handle| handle.snapshot()).collect();
    if cli.json {
        match serde_json::to_string_pretty(&books) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("failed to render json: {err}"),
        }
    } else {
        println!("libris_core version={}", core_version());
        println!("path={} books={}", library.path().display(), books.len());
        for book in &books {
            println!("{book}");
        }
    }

    library.shutdown()?;
    Ok(())
}
