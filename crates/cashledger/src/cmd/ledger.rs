//! Implementation of the cashledger-ledger command.

use crate::cmd::{init_tracing, load_book, CompressionArg};
use anyhow::{Context, Result};
use cashledger_core::{format_ledger, FormatConfig};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Render a GnuCash book as ledger-cli text.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The GnuCash file to render (`-` reads standard input)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Decimal places amounts are rounded to
    #[arg(short = 'p', long, default_value = "2")]
    pub places: u32,

    /// Width of the account column
    #[arg(short = 'w', long, default_value = "50")]
    pub account_width: usize,

    /// How the input is compressed
    #[arg(long, value_enum, default_value = "auto")]
    pub compression: CompressionArg,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The formatter configuration selected by the flags.
    pub fn format_config(&self) -> FormatConfig {
        FormatConfig {
            account_width: self.account_width,
            ..FormatConfig::with_decimal_places(self.places)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let book = load_book(&args.file, args.compression)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    let text = format_ledger(&book, &args.format_config());

    match &args.output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if args.verbose {
                eprintln!("wrote {}", path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the ledger command.
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
