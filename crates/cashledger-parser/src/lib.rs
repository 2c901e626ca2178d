//! GnuCash XML decoder.
//!
//! This crate turns an uncompressed GnuCash v2 XML document into a
//! [`Book`](cashledger_core::Book): commodities are interned, account parent
//! references are resolved into a tree, and every split is linked to both its
//! transaction and its account.
//!
//! Decoding fails fast with a [`DecodeError`]; there is no partial result.
//!
//! # Example
//!
//! ```
//! let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
//! <gnc-v2 xmlns:gnc="http://www.gnucash.org/XML/gnc"
//!         xmlns:act="http://www.gnucash.org/XML/act"
//!         xmlns:book="http://www.gnucash.org/XML/book"
//!         xmlns:cd="http://www.gnucash.org/XML/cd">
//!   <gnc:count-data cd:type="book">1</gnc:count-data>
//!   <gnc:book version="2.0.0">
//!     <book:id type="guid">b0</book:id>
//!     <gnc:account version="2.0.0">
//!       <act:name>Root Account</act:name>
//!       <act:id type="guid">r0</act:id>
//!       <act:type>ROOT</act:type>
//!     </gnc:account>
//!   </gnc:book>
//! </gnc-v2>"#;
//!
//! let book = cashledger_parser::parse(xml).unwrap();
//! assert_eq!(book.guid(), "b0");
//! assert!(book.root_account().is_root());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod account;
mod book;
mod commodity;
mod date;
mod error;
mod price;
mod slots;
mod transaction;
mod xml;

pub use book::decode_document;
pub use date::{parse_gdate, parse_timestamp};
pub use error::DecodeError;
pub use slots::decode_slots;
pub use xml::ns;

use cashledger_core::Book;

/// Parse and decode GnuCash XML text.
///
/// # Errors
///
/// Returns [`DecodeError::Xml`] if the text is not well-formed XML, or any
/// other [`DecodeError`] raised while decoding the document.
pub fn parse(xml: &str) -> Result<Book, DecodeError> {
    let doc = roxmltree::Document::parse(xml)?;
    decode_document(&doc)
}
