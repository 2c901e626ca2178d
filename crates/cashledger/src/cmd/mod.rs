//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod accounts;
pub mod check;
pub mod ledger;

use cashledger_core::Book;
use cashledger_loader::{Compression, LoadError, Loader};
use clap::ValueEnum;
use std::io;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Input compression, as selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    /// Detect gzip by its magic bytes (default)
    #[default]
    Auto,
    /// Input is gzip-compressed
    Gzip,
    /// Input is plain XML
    Plain,
}

impl From<CompressionArg> for Compression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Auto => Self::Auto,
            CompressionArg::Gzip => Self::Gzip,
            CompressionArg::Plain => Self::Plain,
        }
    }
}

/// Install the tracing subscriber used by `--verbose`.
///
/// `RUST_LOG` overrides the default `debug` filter.
pub(crate) fn init_tracing(verbose: bool) {
    if !verbose {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr)
        .init();
}

/// Load a book from `path`, or from standard input when `path` is `-`.
pub fn load_book(path: &Path, compression: CompressionArg) -> Result<Book, LoadError> {
    let loader = Loader::new().with_compression(compression.into());
    if path == Path::new("-") {
        loader.load_reader(io::stdin().lock())
    } else {
        loader.load(path)
    }
}
