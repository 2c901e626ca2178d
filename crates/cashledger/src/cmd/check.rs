//! Implementation of the cashledger-check command.

use crate::cmd::{init_tracing, load_book, CompressionArg, OutputFormat};
use anyhow::{Context, Result};
use cashledger_core::Book;
use cashledger_loader::LoadError;
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Decode a GnuCash book and summarize its contents.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The GnuCash file to check (`-` reads standard input)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Show verbose output including timing information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// How the input is compressed
    #[arg(long, value_enum, default_value = "auto")]
    pub compression: CompressionArg,
}

/// What a decoded book contains.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    /// Book identifier.
    pub book: String,
    /// Commodities, declared and registered.
    pub commodities: usize,
    /// Commodities declared in the book's commodity list.
    pub declared_commodities: usize,
    /// Accounts, root included.
    pub accounts: usize,
    /// Transactions.
    pub transactions: usize,
    /// Splits.
    pub splits: usize,
    /// Price database entries.
    pub prices: usize,
    /// Earliest posting date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_posted: Option<NaiveDate>,
    /// Latest posting date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_posted: Option<NaiveDate>,
}

impl Summary {
    /// Summarize a book.
    pub fn of(book: &Book) -> Self {
        let dates: Vec<NaiveDate> = book
            .transactions()
            .map(|(_, t)| t.date_posted.date_naive())
            .collect();
        Self {
            book: book.guid().to_string(),
            commodities: book.commodities().len(),
            declared_commodities: book.commodities().declared().count(),
            accounts: book.account_count(),
            transactions: book.transaction_count(),
            splits: book.split_count(),
            prices: book.prices().len(),
            first_posted: dates.iter().min().copied(),
            last_posted: dates.iter().max().copied(),
        }
    }
}

/// A decode failure in JSON form.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// Source file path
    pub file: String,
    /// Error code (e.g., "D0005")
    pub code: String,
    /// Short error label
    pub label: String,
    /// Error message
    pub message: String,
}

impl JsonDiagnostic {
    /// Build a diagnostic for a load failure.
    pub fn from_error(err: &LoadError) -> Self {
        let (code, label, message) = match err.decode_error() {
            Some(decode) => (
                format!("D{:04}", decode.kind_code()),
                decode.label().to_string(),
                decode.to_string(),
            ),
            None => ("L0001".to_string(), "load failure".to_string(), err.to_string()),
        };
        Self {
            file: err.path().display().to_string(),
            code,
            label,
            message,
        }
    }
}

/// Write the text form of a summary.
pub fn write_summary<W: Write>(out: &mut W, file: &str, summary: &Summary) -> io::Result<()> {
    writeln!(out, "{file}: book {}", summary.book)?;
    writeln!(
        out,
        "  commodities:  {} ({} declared)",
        summary.commodities, summary.declared_commodities
    )?;
    writeln!(out, "  accounts:     {}", summary.accounts)?;
    writeln!(out, "  transactions: {}", summary.transactions)?;
    writeln!(out, "  splits:       {}", summary.splits)?;
    writeln!(out, "  prices:       {}", summary.prices)?;
    if let (Some(first), Some(last)) = (summary.first_posted, summary.last_posted) {
        writeln!(out, "  period:       {first} .. {last}")?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<ExitCode> {
    let start = std::time::Instant::now();
    let mut stdout = io::stdout().lock();
    let file = args.file.display().to_string();

    let book = match load_book(&args.file, args.compression) {
        Ok(book) => book,
        Err(err) => {
            if !args.quiet {
                let diagnostic = JsonDiagnostic::from_error(&err);
                match args.format {
                    OutputFormat::Text => {
                        eprintln!(
                            "error[{}]: {}: {}",
                            diagnostic.code, diagnostic.file, diagnostic.message
                        );
                    }
                    OutputFormat::Json => {
                        let json = serde_json::to_string_pretty(&diagnostic)
                            .context("failed to serialize diagnostic")?;
                        writeln!(stdout, "{json}")?;
                    }
                }
            }
            return Ok(ExitCode::from(2));
        }
    };

    if args.quiet {
        return Ok(ExitCode::SUCCESS);
    }

    let summary = Summary::of(&book);
    match args.format {
        OutputFormat::Text => write_summary(&mut stdout, &file, &summary)?,
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
            writeln!(stdout, "{json}")?;
        }
    }

    if args.verbose {
        eprintln!("checked in {:.2?}", start.elapsed());
    }
    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the check command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
