//! Transactions and their splits.
//!
//! A [`Split`] is stored once in its [`Book`](crate::Book) and referenced by
//! [`SplitId`] from both its owning [`Transaction`] and its target
//! [`Account`](crate::Account).

use chrono::{DateTime, FixedOffset};
use num_rational::BigRational;
use serde::Serialize;
use std::fmt;

use crate::account::AccountId;
use crate::commodity::CommodityId;
use crate::slot::Slots;

/// Handle to a transaction of a [`Book`](crate::Book).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TransactionId(pub(crate) usize);

impl TransactionId {
    /// Position of the transaction in document order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to a split of a [`Book`](crate::Book).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SplitId(pub(crate) usize);

impl SplitId {
    /// Position of the split in document order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A dated, described group of splits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Globally unique identifier.
    pub guid: String,
    /// Currency the split values are expressed in.
    pub currency: CommodityId,
    /// Posting date.
    pub date_posted: DateTime<FixedOffset>,
    /// Entry date.
    pub date_entered: DateTime<FixedOffset>,
    /// Description (may be empty).
    pub description: String,
    /// Human reference number.
    pub num: Option<String>,
    /// Transaction metadata.
    pub slots: Slots,
    pub(crate) splits: Vec<SplitId>,
}

impl Transaction {
    /// Create a transaction without splits.
    pub fn new(
        guid: impl Into<String>,
        currency: CommodityId,
        date_posted: DateTime<FixedOffset>,
        date_entered: DateTime<FixedOffset>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            guid: guid.into(),
            currency,
            date_posted,
            date_entered,
            description: description.into(),
            num: None,
            slots: Slots::new(),
            splits: Vec::new(),
        }
    }

    /// Splits in document order.
    pub fn splits(&self) -> &[SplitId] {
        &self.splits
    }
}

/// Reconciliation state of a split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ReconcileState {
    /// `n`
    NotReconciled,
    /// `c`
    Cleared,
    /// `y`
    Reconciled,
    /// `f`
    Frozen,
    /// `v`
    Voided,
    /// Any other code, kept verbatim
    Other(String),
}

impl ReconcileState {
    /// Map a state code to its state.
    pub fn from_code(code: &str) -> Self {
        match code {
            "n" => Self::NotReconciled,
            "c" => Self::Cleared,
            "y" => Self::Reconciled,
            "f" => Self::Frozen,
            "v" => Self::Voided,
            other => Self::Other(other.to_string()),
        }
    }

    /// The state code as written in the file format.
    pub fn code(&self) -> &str {
        match self {
            Self::NotReconciled => "n",
            Self::Cleared => "c",
            Self::Reconciled => "y",
            Self::Frozen => "f",
            Self::Voided => "v",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One posting of value and quantity against one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Split {
    /// Globally unique identifier.
    pub guid: String,
    /// Memo line.
    pub memo: Option<String>,
    /// Reconciliation state.
    pub reconciled_state: ReconcileState,
    /// When the split was reconciled.
    pub reconcile_date: Option<DateTime<FixedOffset>>,
    /// Value in the transaction currency.
    pub value: BigRational,
    /// Quantity in the account commodity.
    pub quantity: BigRational,
    /// Action tag (e.g. `Buy`, `Sell`).
    pub action: Option<String>,
    /// Split metadata.
    pub slots: Slots,
    pub(crate) account: AccountId,
    pub(crate) transaction: TransactionId,
}

impl Split {
    /// Create a split posted to `account` within `transaction`.
    ///
    /// The split only becomes part of the graph once it is pushed into the
    /// book with [`BookBuilder::push_split`](crate::BookBuilder::push_split).
    pub fn new(
        guid: impl Into<String>,
        transaction: TransactionId,
        account: AccountId,
        value: BigRational,
        quantity: BigRational,
    ) -> Self {
        Self {
            guid: guid.into(),
            memo: None,
            reconciled_state: ReconcileState::NotReconciled,
            reconcile_date: None,
            value,
            quantity,
            action: None,
            slots: Slots::new(),
            account,
            transaction,
        }
    }

    /// Target account.
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// Owning transaction.
    pub const fn transaction(&self) -> TransactionId {
        self.transaction
    }
}
