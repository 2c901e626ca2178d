//! Price database.

use cashledger_core::{parse_rational, BookBuilder, Price};
use roxmltree::Node;

use crate::commodity;
use crate::date::timestamp_in;
use crate::xml::{children, optional_text, required, required_text, Tag};
use crate::DecodeError;

const PRICE: Tag = Tag::local("price");
const ID: Tag = Tag::price("id");
const COMMODITY: Tag = Tag::price("commodity");
const CURRENCY: Tag = Tag::price("currency");
const TIME: Tag = Tag::price("time");
const SOURCE: Tag = Tag::price("source");
const TYPE: Tag = Tag::price("type");
const VALUE: Tag = Tag::price("value");

/// Decode the entries of a `gnc:pricedb` element.
///
/// Commodities and currencies are registered on first reference; quotes for
/// currencies outside the book's declarations are common.
pub(crate) fn decode_pricedb(
    pricedb: Node<'_, '_>,
    builder: &mut BookBuilder,
) -> Result<usize, DecodeError> {
    let mut count = 0;
    for node in children(pricedb, PRICE) {
        let price = decode_price(node, builder)?;
        builder.push_price(price);
        count += 1;
    }
    Ok(count)
}

fn decode_price(node: Node<'_, '_>, builder: &mut BookBuilder) -> Result<Price, DecodeError> {
    let guid = required_text(node, ID)?.trim().to_string();
    let table = builder.commodities_mut();
    let commodity = commodity::resolve_or_register(required(node, COMMODITY)?, table)?;
    let currency = commodity::resolve_or_register(required(node, CURRENCY)?, table)?;
    Ok(Price {
        guid,
        commodity,
        currency,
        date: timestamp_in(node, TIME)?,
        value: parse_rational(required_text(node, VALUE)?)?,
        source: optional_text(node, SOURCE),
        price_type: optional_text(node, TYPE),
    })
}
