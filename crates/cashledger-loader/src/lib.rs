//! GnuCash file loader.
//!
//! GnuCash saves books as gzip-compressed XML by default, and as plain XML
//! when compression is turned off in its preferences. This crate reads either
//! form and hands the text to [`cashledger_parser`].
//!
//! # Example
//!
//! ```no_run
//! use cashledger_loader::{Compression, Loader};
//! use std::path::Path;
//!
//! let book = Loader::new()
//!     .with_compression(Compression::Auto)
//!     .load(Path::new("household.gnucash"))?;
//! println!("{} transactions", book.transaction_count());
//! # Ok::<(), cashledger_loader::LoadError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use cashledger_core::Book;
use cashledger_parser::DecodeError;
use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Label used in errors for input that does not come from a file.
const STREAM_LABEL: &str = "<stream>";

/// Errors that can occur during loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading the input.
    #[error("failed to read file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input looked compressed but could not be decompressed.
    #[error("failed to decompress {path}: {source}")]
    Decompress {
        /// The compressed file.
        path: PathBuf,
        /// The underlying IO error from the decoder.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid UTF-8.
    #[error("{path} is not valid UTF-8: {source}")]
    Encoding {
        /// The offending file.
        path: PathBuf,
        /// Where decoding stopped.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The document was read but could not be decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// The offending file.
        path: PathBuf,
        /// The decode failure.
        #[source]
        source: DecodeError,
    },
}

impl LoadError {
    /// The path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Decompress { path, .. }
            | Self::Encoding { path, .. }
            | Self::Decode { path, .. } => path,
        }
    }

    /// The decode failure, if the error happened while decoding.
    pub const fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// How the input is compressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Detect gzip by its magic bytes.
    #[default]
    Auto,
    /// Always gunzip.
    Gzip,
    /// Never gunzip.
    Plain,
}

/// GnuCash file loader.
#[derive(Debug, Default, Clone)]
pub struct Loader {
    compression: Compression,
}

impl Loader {
    /// Create a new loader with automatic compression detection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how the input is compressed.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Load a book from a file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read, decompressed or
    /// decoded.
    pub fn load(&self, path: &Path) -> Result<Book, LoadError> {
        let start = Instant::now();
        let raw = fs::read(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let book = self.decode(&raw, path)?;
        tracing::info!(
            path = %path.display(),
            bytes = raw.len(),
            accounts = book.account_count(),
            transactions = book.transaction_count(),
            elapsed = ?start.elapsed(),
            "loaded book"
        );
        Ok(book)
    }

    /// Load a book from any reader, e.g. standard input.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the stream cannot be read, decompressed or
    /// decoded. Errors carry the path `<stream>`.
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<Book, LoadError> {
        let path = Path::new(STREAM_LABEL);
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.decode(&raw, path)
    }

    fn decode(&self, raw: &[u8], path: &Path) -> Result<Book, LoadError> {
        let gzipped = match self.compression {
            Compression::Auto => is_gzip(raw),
            Compression::Gzip => true,
            Compression::Plain => false,
        };
        tracing::debug!(path = %path.display(), gzipped, "reading document");

        let bytes = if gzipped {
            let mut out = Vec::new();
            GzDecoder::new(raw)
                .read_to_end(&mut out)
                .map_err(|e| LoadError::Decompress {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            Cow::Owned(out)
        } else {
            Cow::Borrowed(raw)
        };

        let text = std::str::from_utf8(&bytes).map_err(|e| LoadError::Encoding {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        cashledger_parser::parse(text).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Check for the gzip magic number.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Load a book from a file, detecting compression.
///
/// This is a convenience function that creates a [`Loader`] and loads the
/// file.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load(path: &Path) -> Result<Book, LoadError> {
    Loader::new().load(path)
}
