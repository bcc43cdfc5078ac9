//! CLI entry point.
//!
//! # Responsibility
//! - Verify `woodquote_core` linkage with a deterministic smoke line.
//! - List the quotes stored in a table file, read-only.
//! - Start file logging under the system temp directory.
//!
//! Usage: `woodquote [TABLE_CSV]`

use std::path::PathBuf;
use std::process::ExitCode;
use woodquote_core::{
    default_log_level, init_logging, margin_band, CsvQuoteRepository, QuoteRepository,
};

fn log_dir() -> PathBuf {
    std::env::temp_dir().join("woodquote").join("logs")
}

fn main() -> ExitCode {
    let log_dir = log_dir();
    if let Err(err) = init_logging(default_log_level(), &log_dir) {
        eprintln!("logging disabled ({}): {err}", log_dir.display());
    }

    println!("woodquote_core ping={}", woodquote_core::ping());
    println!("woodquote_core version={}", woodquote_core::core_version());

    let Some(path) = std::env::args_os().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let repo = CsvQuoteRepository::new(path);
    let records = match repo.load_all() {
        Ok(records) => records,
        Err(err) => {
            eprintln!("failed to read `{}`: {err}", repo.path().display());
            return ExitCode::FAILURE;
        }
    };

    if records.is_empty() {
        println!("no quotes saved yet");
        return ExitCode::SUCCESS;
    }

    for (index, record) in records.iter().enumerate() {
        let percent = record.margin_percent();
        println!(
            "[{index}] {} | {} | {} | net={:.2} margin={:.2}% ({})",
            record.name,
            record.region,
            record.timestamp,
            record.breakdown.net,
            percent,
            margin_band(percent)
        );
    }
    ExitCode::SUCCESS
}
