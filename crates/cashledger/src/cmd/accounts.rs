//! Implementation of the cashledger-accounts command.

use crate::cmd::{init_tracing, load_book, CompressionArg, OutputFormat};
use anyhow::{Context, Result};
use cashledger_core::Book;
use clap::Parser;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// List the accounts of a GnuCash book.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The GnuCash file to read (`-` reads standard input)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only descend this many levels below the root
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// How the input is compressed
    #[arg(long, value_enum, default_value = "auto")]
    pub compression: CompressionArg,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One listed account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountRow {
    /// Colon-separated account path.
    pub name: String,
    /// Account type tag.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Commodity symbol, if the account has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    /// Levels below the root.
    pub depth: usize,
    /// Number of splits posted to the account.
    pub splits: usize,
}

/// Collect the accounts below the root, at most `max_depth` levels deep,
/// ordered by name.
pub fn collect_rows(book: &Book, max_depth: Option<usize>) -> Vec<AccountRow> {
    let mut depths = HashMap::from([(book.root(), 0usize)]);
    let mut rows = Vec::new();

    book.visit(book.root(), |id, account, children, splits| {
        let depth = depths.get(&id).copied().unwrap_or(0);
        if max_depth.is_some_and(|max| depth >= max) {
            children.clear();
        }
        for &child in children.iter() {
            depths.insert(child, depth + 1);
        }
        if account.is_root() {
            return;
        }
        rows.push(AccountRow {
            name: book.full_name(id),
            account_type: account.account_type.to_string(),
            commodity: account.commodity.map(|c| book[c].symbol.clone()),
            depth,
            splits: splits.len(),
        });
    });

    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// Write rows as aligned text.
pub fn write_rows<W: Write>(out: &mut W, rows: &[AccountRow]) -> io::Result<()> {
    let width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    for row in rows {
        writeln!(
            out,
            "{:width$}  {:<10} {:<6} {:>6}",
            row.name,
            row.account_type,
            row.commodity.as_deref().unwrap_or("-"),
            row.splits,
        )?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<ExitCode> {
    let book = load_book(&args.file, args.compression)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    let rows = collect_rows(&book, args.depth);

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => write_rows(&mut stdout, &rows)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).context("failed to serialize accounts")?;
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the accounts command.
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
