//! CLI listing probe.
//!
//! # Responsibility
//! - Open a configured student backend and print its count and one page.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `student_cli <json:PATH|sqlite:PATH|sqlite::memory:> [PAGE_SIZE] [PAGE]`
//!
//! Environment: `STUDENTS_LOG_DIR` enables file logging;
//! `STUDENTS_LOG_LEVEL` overrides the build default level.

use std::process::ExitCode;
use student_core::{default_log_level, init_logging, open_repository, StorageConfig};

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_PAGE: usize = 1;

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    if let Ok(log_dir) = std::env::var("STUDENTS_LOG_DIR") {
        let level = std::env::var("STUDENTS_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let storage = args
        .first()
        .ok_or("missing storage argument (json:PATH|sqlite:PATH|sqlite::memory:)")?;
    let config = StorageConfig::parse(storage).map_err(|err| err.to_string())?;
    let page_size = positional_number(&args, 1, DEFAULT_PAGE_SIZE)?;
    let page = positional_number(&args, 2, DEFAULT_PAGE)?;

    let repo = open_repository(&config).map_err(|err| err.to_string())?;
    let count = repo.count().map_err(|err| err.to_string())?;
    log::info!("event=cli_list module=cli status=ok count={count} page={page}");

    println!("student_core version={}", student_core::core_version());
    println!("students={count}");
    for line in repo
        .get_page(page_size, page)
        .map_err(|err| err.to_string())?
    {
        println!("{line}");
    }
    Ok(())
}

fn positional_number(args: &[String], index: usize, default: usize) -> Result<usize, String> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("argument {} must be a positive integer, got `{raw}`", index + 1)),
        None => Ok(default),
    }
}
