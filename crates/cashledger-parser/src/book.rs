//! Book assembly: the document-level decode driver.

use cashledger_core::{Book, BookBuilder};
use roxmltree::{Document, Node};

use crate::account::decode_accounts;
use crate::commodity::decode_declarations;
use crate::price::decode_pricedb;
use crate::slots::decode_slots;
use crate::transaction::decode_transactions;
use crate::xml::{child, children, ns, required_text, text, Tag};
use crate::DecodeError;

const ROOT: Tag = Tag::local("gnc-v2");
const COUNT_DATA: Tag = Tag::gnc("count-data");
const BOOK: Tag = Tag::gnc("book");
const BOOK_ID: Tag = Tag::book("id");
const BOOK_SLOTS: Tag = Tag::book("slots");
const PRICEDB: Tag = Tag::gnc("pricedb");

fn count_type<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((ns::CD, "type"))
}

/// Check the document-level count records: a book count, if given, must be 1.
fn check_counts(root: Node<'_, '_>) -> Result<(), DecodeError> {
    for record in children(root, COUNT_DATA) {
        if count_type(record) == Some("book") {
            let declared = text(record).trim();
            if declared != "1" {
                return Err(DecodeError::invalid(format!(
                    "document declares {declared:?} books, expected exactly 1"
                )));
            }
        }
    }
    Ok(())
}

/// Decode a parsed document into a [`Book`].
///
/// The document root must be `gnc-v2` and contain exactly one `gnc:book`.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered; no partial book is
/// produced.
pub fn decode_document(doc: &Document<'_>) -> Result<Book, DecodeError> {
    let root = doc.root_element();
    if !ROOT.matches(root) {
        return Err(DecodeError::invalid(format!(
            "unexpected root element <{}>, expected <{ROOT}>",
            root.tag_name().name()
        )));
    }
    check_counts(root)?;

    let mut books = children(root, BOOK);
    let book = books
        .next()
        .ok_or_else(|| DecodeError::invalid("document contains no <gnc:book>"))?;
    if books.next().is_some() {
        return Err(DecodeError::invalid("document contains more than one <gnc:book>"));
    }
    decode_book(book)
}

fn decode_book(book: Node<'_, '_>) -> Result<Book, DecodeError> {
    let guid = required_text(book, BOOK_ID)?.trim().to_string();
    let span = tracing::debug_span!("decode_book", guid = %guid);
    let _enter = span.enter();

    for record in children(book, COUNT_DATA) {
        tracing::debug!(
            kind = count_type(record).unwrap_or("?"),
            count = text(record).trim(),
            "count record"
        );
    }

    let mut builder = BookBuilder::new();

    let declared = decode_declarations(book, builder.commodities_mut())?;
    tracing::debug!(commodities = declared, "decoded commodity declarations");

    if let Some(pricedb) = child(book, PRICEDB) {
        let prices = decode_pricedb(pricedb, &mut builder)?;
        tracing::debug!(prices, "decoded price database");
    }

    let accounts = decode_accounts(book, &mut builder)?;

    let (transactions, splits) = decode_transactions(book, &mut builder, &accounts)?;
    tracing::debug!(transactions, splits, "decoded transactions");

    let slots = decode_slots(child(book, BOOK_SLOTS))?;
    Ok(builder.finish(guid, accounts.root, slots))
}
