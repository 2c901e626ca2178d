//! GnuCash command-line tools.
//!
//! This crate provides command-line tools for working with GnuCash books:
//!
//! - `cashledger-check`: Decode a book and report what it contains
//! - `cashledger-ledger`: Render a book as ledger-cli text
//! - `cashledger-accounts`: Print the account tree
//!
//! # Example Usage
//!
//! ```bash
//! cashledger-check household.gnucash
//! cashledger-ledger household.gnucash > household.ledger
//! cashledger-accounts --depth 2 household.gnucash
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
