//! Ledger-cli text rendering.
//!
//! Renders a [`Book`] as plain-text ledger: commodity declarations, account
//! declarations and date-ordered transactions with one posting per split.

use std::fmt::Write;

use crate::value::to_fixed;
use crate::{Book, Transaction};

/// Formatter configuration.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Width the account column is padded to (default: 50).
    pub account_width: usize,
    /// Width the amount is right-aligned to (default: 12).
    pub amount_width: usize,
    /// Fractional digits amounts are rounded to (default: 2).
    pub decimal_places: u32,
    /// Indentation for postings and declaration sub-lines.
    pub indent: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            account_width: 50,
            amount_width: 12,
            decimal_places: 2,
            indent: "\t".to_string(),
        }
    }
}

impl FormatConfig {
    /// Create a new config with the specified number of decimal places.
    #[must_use]
    pub fn with_decimal_places(decimal_places: u32) -> Self {
        Self {
            decimal_places,
            ..Default::default()
        }
    }
}

/// Render a whole book.
pub fn format_ledger(book: &Book, config: &FormatConfig) -> String {
    let mut out = String::new();

    for (_, commodity) in book.commodities().declared() {
        writeln!(out, "commodity {}", commodity.symbol).unwrap();
        writeln!(out, "{}namespace {}", config.indent, commodity.namespace).unwrap();
        out.push('\n');
    }

    for (id, account) in book.accounts() {
        if account.is_root() {
            continue;
        }
        writeln!(out, "account {}", book.full_name(id)).unwrap();
        if let Some(description) = account.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(out, "{}note {description}", config.indent).unwrap();
        }
        if let Some(commodity) = account.commodity {
            writeln!(
                out,
                "{}check commodity == \"{}\"",
                config.indent, book[commodity].symbol
            )
            .unwrap();
        }
        out.push('\n');
    }

    let mut transactions: Vec<&Transaction> = book.transactions().map(|(_, t)| t).collect();
    transactions.sort_by_key(|t| t.date_posted);
    for txn in transactions {
        out.push_str(&format_transaction(book, txn, config));
        out.push('\n');
    }

    out
}

/// Render one transaction with its postings.
pub fn format_transaction(book: &Book, txn: &Transaction, config: &FormatConfig) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{} * {}",
        txn.date_posted.format("%Y/%m/%d"),
        txn.description
    )
    .unwrap();

    for &split_id in txn.splits() {
        let split = &book[split_id];
        let account = &book[split.account()];
        let symbol = account.commodity.map_or("", |c| book[c].symbol.as_str());
        write!(
            out,
            "{}{:aw$} {:>nw$} {}",
            config.indent,
            book.full_name(split.account()),
            to_fixed(&split.value, config.decimal_places),
            symbol,
            aw = config.account_width,
            nw = config.amount_width,
        )
        .unwrap();
        if let Some(memo) = split.memo.as_deref().filter(|m| !m.is_empty()) {
            write!(out, " ; {memo}").unwrap();
        }
        out.push('\n');
    }

    out
}
