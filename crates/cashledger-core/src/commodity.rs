//! Commodities and the identity table that interns them.
//!
//! A commodity is identified by its `(namespace, symbol)` pair, e.g.
//! `("ISO4217", "EUR")` or `("NASDAQ", "AAPL")`. Within one book every pair
//! maps to exactly one entry of the [`CommodityTable`]; every holder refers to
//! it through a [`CommodityId`] handle, so two references to the same pair are
//! identity-equal rather than merely attribute-equal.
//!
//! # Example
//!
//! ```
//! use cashledger_core::{Commodity, CommodityTable};
//!
//! let mut table = CommodityTable::new();
//! let eur = table.declare(Commodity::new("ISO4217", "EUR").with_name("Euro"));
//!
//! // Referencing the same pair again yields the same handle.
//! assert_eq!(table.resolve_or_register("ISO4217", "EUR"), eur);
//! assert_eq!(table[eur].name.as_deref(), Some("Euro"));
//!
//! // Unknown pairs are registered lazily as bare commodities.
//! let usd = table.resolve_or_register("ISO4217", "USD");
//! assert_ne!(usd, eur);
//! assert_eq!(table.len(), 2);
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// Handle to an entry of a [`CommodityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CommodityId(usize);

impl CommodityId {
    /// Position of the commodity in its table.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// How a commodity entered the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommodityOrigin {
    /// Declared in the book's root commodity list.
    Declared,
    /// Registered on first reference (e.g. a price database currency).
    Registered,
}

/// A tradable unit of value: a currency or a security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commodity {
    /// Namespace, e.g. `ISO4217`, `NASDAQ`, `template`.
    pub namespace: String,
    /// Symbol within the namespace, e.g. `EUR`.
    pub symbol: String,
    /// Display name.
    pub name: Option<String>,
    /// Exchange code such as an ISIN or CUSIP.
    pub xcode: Option<String>,
    /// Smallest fraction traded (e.g. `100` for cents).
    pub fraction: Option<i64>,
    /// Online quote source name.
    pub quote_source: Option<String>,
    /// Whether online quotes are fetched for this commodity.
    pub get_quotes: bool,
    /// Whether the entry was declared or lazily registered.
    pub origin: CommodityOrigin,
}

impl Commodity {
    /// Create a bare declared commodity.
    pub fn new(namespace: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            symbol: symbol.into(),
            name: None,
            xcode: None,
            fraction: None,
            quote_source: None,
            get_quotes: false,
            origin: CommodityOrigin::Declared,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the exchange code.
    #[must_use]
    pub fn with_xcode(mut self, xcode: impl Into<String>) -> Self {
        self.xcode = Some(xcode.into());
        self
    }

    /// Set the smallest traded fraction.
    #[must_use]
    pub const fn with_fraction(mut self, fraction: i64) -> Self {
        self.fraction = Some(fraction);
        self
    }

    /// The `(namespace, symbol)` identity key.
    pub fn key(&self) -> (&str, &str) {
        (&self.namespace, &self.symbol)
    }

    /// Whether this entry came from a root-level declaration.
    pub fn is_declared(&self) -> bool {
        self.origin == CommodityOrigin::Declared
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.symbol)
    }
}

/// Identity table of commodities keyed by `(namespace, symbol)`.
///
/// Entries are never removed, so a [`CommodityId`] stays valid for the
/// lifetime of the table.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CommodityTable {
    entries: Vec<Commodity>,
    #[serde(skip)]
    index: HashMap<(String, String), CommodityId>,
}

impl CommodityTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a full declaration.
    ///
    /// If the key is already present the existing entry is overwritten in
    /// place (last declaration wins) and keeps its handle; a lazily
    /// registered stub is upgraded to a declared entry this way.
    pub fn declare(&mut self, mut commodity: Commodity) -> CommodityId {
        commodity.origin = CommodityOrigin::Declared;
        if let Some(id) = self.resolve(&commodity.namespace, &commodity.symbol) {
            self.entries[id.0] = commodity;
            return id;
        }
        self.push(commodity)
    }

    /// Look up an existing entry.
    pub fn resolve(&self, namespace: &str, symbol: &str) -> Option<CommodityId> {
        self.index
            .get(&(namespace.to_string(), symbol.to_string()))
            .copied()
    }

    /// Look up an entry, registering a bare commodity if it is missing.
    ///
    /// A registration for a key that is already present is a no-op that
    /// returns the existing entry.
    pub fn resolve_or_register(&mut self, namespace: &str, symbol: &str) -> CommodityId {
        if let Some(id) = self.resolve(namespace, symbol) {
            return id;
        }
        let mut commodity = Commodity::new(namespace, symbol);
        commodity.origin = CommodityOrigin::Registered;
        self.push(commodity)
    }

    fn push(&mut self, commodity: Commodity) -> CommodityId {
        let id = CommodityId(self.entries.len());
        self.index.insert((commodity.namespace.clone(), commodity.symbol.clone()), id);
        self.entries.push(commodity);
        id
    }

    /// Check whether a key is present.
    pub fn contains(&self, namespace: &str, symbol: &str) -> bool {
        self.resolve(namespace, symbol).is_some()
    }

    /// Get an entry by handle.
    pub fn get(&self, id: CommodityId) -> Option<&Commodity> {
        self.entries.get(id.0)
    }

    /// Number of entries, declared and registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CommodityId, &Commodity)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, c)| (CommodityId(i), c))
    }

    /// Iterate over the entries declared in the root commodity list.
    pub fn declared(&self) -> impl Iterator<Item = (CommodityId, &Commodity)> {
        self.iter().filter(|(_, c)| c.is_declared())
    }
}

impl Index<CommodityId> for CommodityTable {
    type Output = Commodity;

    fn index(&self, id: CommodityId) -> &Self::Output {
        &self.entries[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_then_resolve_same_handle() {
        let mut table = CommodityTable::new();
        let eur = table.declare(Commodity::new("ISO4217", "EUR"));
        assert_eq!(table.resolve("ISO4217", "EUR"), Some(eur));
        assert_eq!(table.resolve_or_register("ISO4217", "EUR"), eur);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_namespace_is_part_of_identity() {
        let mut table = CommodityTable::new();
        let a = table.declare(Commodity::new("NASDAQ", "ABC"));
        let b = table.declare(Commodity::new("NYSE", "ABC"));
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_register_creates_bare_entry() {
        let mut table = CommodityTable::new();
        let usd = table.resolve_or_register("ISO4217", "USD");
        let entry = &table[usd];
        assert_eq!(entry.origin, CommodityOrigin::Registered);
        assert!(entry.name.is_none());
        assert!(entry.xcode.is_none());
        assert_eq!(table.declared().count(), 0);
    }

    #[test]
    fn test_declaration_upgrades_registered_stub() {
        let mut table = CommodityTable::new();
        let stub = table.resolve_or_register("ISO4217", "USD");
        let declared = table.declare(Commodity::new("ISO4217", "USD").with_name("US Dollar"));
        assert_eq!(stub, declared);
        assert!(table[stub].is_declared());
        assert_eq!(table[stub].name.as_deref(), Some("US Dollar"));
    }

    #[test]
    fn test_register_after_declaration_keeps_rich_entry() {
        let mut table = CommodityTable::new();
        let id = table.declare(Commodity::new("FUND", "VTI").with_xcode("US9229087690"));
        assert_eq!(table.resolve_or_register("FUND", "VTI"), id);
        assert_eq!(table[id].xcode.as_deref(), Some("US9229087690"));
        assert!(table[id].is_declared());
    }

    #[test]
    fn test_duplicate_declaration_last_write_wins() {
        // Conflicting declarations for one key have no defined resolution in
        // the file format; the table keeps the later one.
        let mut table = CommodityTable::new();
        let first = table.declare(Commodity::new("ISO4217", "EUR").with_name("Euro"));
        let second = table.declare(Commodity::new("ISO4217", "EUR").with_name("Euro (2)"));
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Commodity::new("ISO4217", "EUR").to_string(), "ISO4217:EUR");
    }
}
