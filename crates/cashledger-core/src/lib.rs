//! Core types for cashledger
//!
//! This crate provides the in-memory graph a GnuCash book decodes into:
//!
//! - [`Commodity`] / [`CommodityTable`] - Currencies and securities, interned by `(namespace, symbol)`
//! - [`Account`] - A node of the chart-of-accounts tree
//! - [`Transaction`] / [`Split`] - Dated groups of postings against accounts
//! - [`Price`] - Price database entries
//! - [`SlotValue`] - Recursive key/value metadata
//! - [`Book`] - The aggregate root owning all of the above
//!
//! Monetary values are exact [`BigRational`]s; see [`value`].
//!
//! # Example
//!
//! ```
//! use cashledger_core::{Account, BookBuilder, Commodity, Slots};
//!
//! let mut builder = BookBuilder::new();
//! let eur = builder.commodities_mut().declare(Commodity::new("ISO4217", "EUR"));
//! let root = builder.push_account(Account::new("r", "Root Account", "ROOT"));
//! let assets = builder.push_account(Account::new("a", "Assets", "ASSET").with_commodity(eur, Some(100)));
//! let bank = builder.push_account(Account::new("b", "Bank", "BANK").with_commodity(eur, Some(100)));
//! builder.set_parent(assets, root);
//! builder.set_parent(bank, assets);
//!
//! let book = builder.finish("book-guid", root, Slots::new());
//! assert_eq!(book.full_name(bank), "Assets:Bank");
//! assert_eq!(book.walk(root).count(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod book;
pub mod commodity;
pub mod format;
pub mod price;
pub mod slot;
pub mod transaction;
pub mod value;

pub use account::{Account, AccountId, AccountType};
pub use book::{Book, BookBuilder, GuidRef, Walk, WalkEntry};
pub use commodity::{Commodity, CommodityId, CommodityOrigin, CommodityTable};
pub use format::{format_ledger, format_transaction, FormatConfig};
pub use price::Price;
pub use slot::{SlotValue, Slots};
pub use transaction::{ReconcileState, Split, SplitId, Transaction, TransactionId};
pub use value::{format_rational, parse_rational, MalformedNumber};

// Re-export commonly used external types
pub use chrono::{DateTime, FixedOffset, NaiveDate};
pub use num_rational::BigRational;
