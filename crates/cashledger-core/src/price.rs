//! Price database entries.

use chrono::{DateTime, FixedOffset};
use num_rational::BigRational;
use serde::Serialize;

use crate::commodity::CommodityId;

/// A quoted value of one commodity in terms of another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Price {
    /// Globally unique identifier.
    pub guid: String,
    /// The priced commodity.
    pub commodity: CommodityId,
    /// The currency the price is expressed in.
    pub currency: CommodityId,
    /// Quote time.
    pub date: DateTime<FixedOffset>,
    /// Price of one unit of `commodity` in `currency`.
    pub value: BigRational,
    /// Where the quote came from (e.g. `user:price-editor`, `Finance::Quote`).
    pub source: Option<String>,
    /// Quote type (e.g. `last`, `nav`, `transaction`).
    pub price_type: Option<String>,
}
