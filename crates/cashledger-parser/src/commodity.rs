//! Commodity declarations and references.

use cashledger_core::{Commodity, CommodityId, CommodityTable};
use roxmltree::Node;

use crate::xml::{child, children, optional_text, parse_integer, required_text, Tag};
use crate::DecodeError;

const COMMODITY: Tag = Tag::gnc("commodity");
const SPACE: Tag = Tag::cmdty("space");
const ID: Tag = Tag::cmdty("id");
const NAME: Tag = Tag::cmdty("name");
const XCODE: Tag = Tag::cmdty("xcode");
const FRACTION: Tag = Tag::cmdty("fraction");
const QUOTE_SOURCE: Tag = Tag::cmdty("quote_source");
const GET_QUOTES: Tag = Tag::cmdty("get_quotes");

/// Read the `(namespace, symbol)` pair of a declaration or reference element.
pub(crate) fn reference_key(node: Node<'_, '_>) -> Result<(String, String), DecodeError> {
    let namespace = required_text(node, SPACE)?.trim().to_string();
    let symbol = required_text(node, ID)?.trim().to_string();
    Ok((namespace, symbol))
}

/// Decode a full `gnc:commodity` declaration.
pub(crate) fn decode_declaration(node: Node<'_, '_>) -> Result<Commodity, DecodeError> {
    let (namespace, symbol) = reference_key(node)?;
    let mut commodity = Commodity::new(namespace, symbol);
    commodity.name = optional_text(node, NAME);
    commodity.xcode = optional_text(node, XCODE);
    commodity.fraction = optional_text(node, FRACTION)
        .map(|text| parse_integer(&text))
        .transpose()?;
    commodity.quote_source = optional_text(node, QUOTE_SOURCE);
    commodity.get_quotes = child(node, GET_QUOTES).is_some();
    Ok(commodity)
}

/// Register every root-level commodity declaration of `book`.
pub(crate) fn decode_declarations(
    book: Node<'_, '_>,
    table: &mut CommodityTable,
) -> Result<usize, DecodeError> {
    let mut count = 0;
    for node in children(book, COMMODITY) {
        let commodity = decode_declaration(node)?;
        if table.contains(&commodity.namespace, &commodity.symbol) {
            tracing::warn!(
                commodity = %commodity,
                "duplicate commodity declaration, keeping the last one"
            );
        }
        table.declare(commodity);
        count += 1;
    }
    Ok(count)
}

/// Resolve a reference that must name an already registered commodity.
pub(crate) fn resolve(
    node: Node<'_, '_>,
    table: &CommodityTable,
) -> Result<CommodityId, DecodeError> {
    let (namespace, symbol) = reference_key(node)?;
    table
        .resolve(&namespace, &symbol)
        .ok_or(DecodeError::UnresolvedCommodityReference { namespace, symbol })
}

/// Resolve a reference, registering a bare commodity if it is unknown.
pub(crate) fn resolve_or_register(
    node: Node<'_, '_>,
    table: &mut CommodityTable,
) -> Result<CommodityId, DecodeError> {
    let (namespace, symbol) = reference_key(node)?;
    Ok(table.resolve_or_register(&namespace, &symbol))
}
