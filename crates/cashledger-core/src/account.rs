//! Accounts of the chart-of-accounts tree.

use serde::Serialize;
use std::fmt;

use crate::commodity::CommodityId;
use crate::slot::Slots;
use crate::transaction::SplitId;

/// Handle to an account of a [`Book`](crate::Book).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AccountId(pub(crate) usize);

impl AccountId {
    /// Position of the account in its book.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Account type tag.
///
/// The format allows vendor extensions, so this is an open set: any tag is
/// accepted and the well-known ones are provided as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AccountType(String);

impl AccountType {
    /// The tree root.
    pub const ROOT: &'static str = "ROOT";
    /// Generic asset.
    pub const ASSET: &'static str = "ASSET";
    /// Generic liability.
    pub const LIABILITY: &'static str = "LIABILITY";
    /// Income.
    pub const INCOME: &'static str = "INCOME";
    /// Expense.
    pub const EXPENSE: &'static str = "EXPENSE";
    /// Equity.
    pub const EQUITY: &'static str = "EQUITY";
    /// Bank account.
    pub const BANK: &'static str = "BANK";
    /// Cash.
    pub const CASH: &'static str = "CASH";
    /// Credit card.
    pub const CREDIT: &'static str = "CREDIT";
    /// Stock holding.
    pub const STOCK: &'static str = "STOCK";
    /// Mutual fund holding.
    pub const MUTUAL: &'static str = "MUTUAL";
    /// Accounts receivable.
    pub const RECEIVABLE: &'static str = "RECEIVABLE";
    /// Accounts payable.
    pub const PAYABLE: &'static str = "PAYABLE";
    /// Trading account.
    pub const TRADING: &'static str = "TRADING";

    /// Create a type tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is the `ROOT` tag.
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for AccountType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AccountType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A node of the account tree.
///
/// The link fields (parent, children, splits) are filled in by the owning
/// [`Book`](crate::Book) and exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Globally unique identifier.
    pub guid: String,
    /// Name of this path segment.
    pub name: String,
    /// Type tag.
    pub account_type: AccountType,
    /// Free-text description.
    pub description: Option<String>,
    /// Commodity the account is denominated in (absent only for `ROOT`).
    pub commodity: Option<CommodityId>,
    /// Smallest currency unit denominator (absent only for `ROOT`).
    pub commodity_scu: Option<i64>,
    /// Account metadata.
    pub slots: Slots,
    pub(crate) parent: Option<AccountId>,
    pub(crate) children: Vec<AccountId>,
    pub(crate) splits: Vec<SplitId>,
}

impl Account {
    /// Create an unlinked account.
    pub fn new(
        guid: impl Into<String>,
        name: impl Into<String>,
        account_type: impl Into<String>,
    ) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            account_type: AccountType::new(account_type),
            description: None,
            commodity: None,
            commodity_scu: None,
            slots: Slots::new(),
            parent: None,
            children: Vec::new(),
            splits: Vec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the commodity and its smallest currency unit.
    #[must_use]
    pub const fn with_commodity(mut self, commodity: CommodityId, scu: Option<i64>) -> Self {
        self.commodity = Some(commodity);
        self.commodity_scu = scu;
        self
    }

    /// Set the metadata.
    #[must_use]
    pub fn with_slots(mut self, slots: Slots) -> Self {
        self.slots = slots;
        self
    }

    /// Check whether this is the tree root.
    pub fn is_root(&self) -> bool {
        self.account_type.is_root()
    }

    /// Parent account, absent only for the root.
    pub const fn parent(&self) -> Option<AccountId> {
        self.parent
    }

    /// Direct children, in linking order.
    pub fn children(&self) -> &[AccountId] {
        &self.children
    }

    /// Splits posted to this account, in document order.
    pub fn splits(&self) -> &[SplitId] {
        &self.splits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_is_open() {
        let vendor = AccountType::new("VENDOR_THING");
        assert_eq!(vendor.as_str(), "VENDOR_THING");
        assert!(!vendor.is_root());
        assert!(AccountType::new(AccountType::ROOT).is_root());
        assert_eq!(AccountType::new("BANK"), AccountType::BANK);
    }

    #[test]
    fn test_new_account_is_unlinked() {
        let account = Account::new("abc", "Checking", "BANK").with_description("Main");
        assert_eq!(account.parent(), None);
        assert!(account.children().is_empty());
        assert!(account.splits().is_empty());
        assert_eq!(account.description.as_deref(), Some("Main"));
        assert!(!account.is_root());
    }
}
