//! The book: aggregate root of one decoded ledger document.
//!
//! Accounts, transactions and splits live in arenas owned by the [`Book`] and
//! refer to each other through copyable handles ([`AccountId`],
//! [`TransactionId`], [`SplitId`], [`CommodityId`]). A split is stored once and
//! its handle appears in both its transaction's and its account's split list.
//!
//! Books are assembled with a [`BookBuilder`], which keeps the back-links
//! consistent while records are added.

use serde::Serialize;
use std::collections::VecDeque;
use std::ops::Index;

use crate::account::{Account, AccountId};
use crate::commodity::{Commodity, CommodityId, CommodityTable};
use crate::price::Price;
use crate::slot::Slots;
use crate::transaction::{Split, SplitId, Transaction, TransactionId};

/// Incrementally assembles a [`Book`].
#[derive(Debug, Default)]
pub struct BookBuilder {
    commodities: CommodityTable,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    splits: Vec<Split>,
    prices: Vec<Price>,
}

impl BookBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commodity identity table.
    pub const fn commodities(&self) -> &CommodityTable {
        &self.commodities
    }

    /// Mutable access to the commodity identity table.
    pub fn commodities_mut(&mut self) -> &mut CommodityTable {
        &mut self.commodities
    }

    /// Add an account. Its link fields start empty.
    pub fn push_account(&mut self, mut account: Account) -> AccountId {
        account.parent = None;
        account.children.clear();
        account.splits.clear();
        let id = AccountId(self.accounts.len());
        self.accounts.push(account);
        id
    }

    /// Get an account added earlier.
    pub fn account(&self, id: AccountId) -> &Account {
        &self.accounts[id.0]
    }

    /// Number of accounts added so far.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Link `child` under `parent`, setting the back-link and appending the
    /// child to the parent's children.
    pub fn set_parent(&mut self, child: AccountId, parent: AccountId) {
        if let Some(previous) = self.accounts[child.0].parent.replace(parent) {
            self.accounts[previous.0].children.retain(|&c| c != child);
        }
        self.accounts[parent.0].children.push(child);
    }

    /// Add a transaction. Its split list starts empty.
    pub fn push_transaction(&mut self, mut transaction: Transaction) -> TransactionId {
        transaction.splits.clear();
        let id = TransactionId(self.transactions.len());
        self.transactions.push(transaction);
        id
    }

    /// Add a split, appending it to its transaction's and its account's split
    /// lists.
    ///
    /// # Panics
    ///
    /// Panics if the split's account or transaction handle was not issued by
    /// this builder.
    pub fn push_split(&mut self, split: Split) -> SplitId {
        let id = SplitId(self.splits.len());
        self.transactions[split.transaction.0].splits.push(id);
        self.accounts[split.account.0].splits.push(id);
        self.splits.push(split);
        id
    }

    /// Add a price database entry.
    pub fn push_price(&mut self, price: Price) {
        self.prices.push(price);
    }

    /// Finish the book with its identifier, root account and metadata.
    pub fn finish(self, guid: impl Into<String>, root: AccountId, slots: Slots) -> Book {
        Book {
            guid: guid.into(),
            commodities: self.commodities,
            accounts: self.accounts,
            root,
            transactions: self.transactions,
            splits: self.splits,
            prices: self.prices,
            slots,
        }
    }
}

/// A decoded GnuCash book.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    guid: String,
    commodities: CommodityTable,
    accounts: Vec<Account>,
    root: AccountId,
    transactions: Vec<Transaction>,
    splits: Vec<Split>,
    prices: Vec<Price>,
    slots: Slots,
}

/// A record found by [`Book::find_guid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidRef {
    /// An account.
    Account(AccountId),
    /// A transaction.
    Transaction(TransactionId),
}

impl Book {
    /// Book identifier.
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Book metadata.
    pub const fn slots(&self) -> &Slots {
        &self.slots
    }

    /// Commodity identity table, including lazily registered entries.
    pub const fn commodities(&self) -> &CommodityTable {
        &self.commodities
    }

    /// The root account handle.
    pub const fn root(&self) -> AccountId {
        self.root
    }

    /// The root account.
    pub fn root_account(&self) -> &Account {
        &self.accounts[self.root.0]
    }

    /// All accounts (root included) in document order.
    pub fn accounts(&self) -> impl Iterator<Item = (AccountId, &Account)> {
        self.accounts
            .iter()
            .enumerate()
            .map(|(i, a)| (AccountId(i), a))
    }

    /// All transactions in document order.
    pub fn transactions(&self) -> impl Iterator<Item = (TransactionId, &Transaction)> {
        self.transactions
            .iter()
            .enumerate()
            .map(|(i, t)| (TransactionId(i), t))
    }

    /// All splits in document order.
    pub fn splits(&self) -> impl Iterator<Item = (SplitId, &Split)> {
        self.splits
            .iter()
            .enumerate()
            .map(|(i, s)| (SplitId(i), s))
    }

    /// Price database entries in document order.
    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    /// Number of accounts, root included.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of transactions.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Number of splits.
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }

    /// Colon-separated path from the root to `id`.
    ///
    /// The root contributes no segment, so the root's own full name is empty
    /// and a top-level account's full name is just its name.
    pub fn full_name(&self, id: AccountId) -> String {
        let mut segments = Vec::new();
        let mut current = &self.accounts[id.0];
        while let Some(parent) = current.parent {
            segments.push(current.name.as_str());
            current = &self.accounts[parent.0];
        }
        segments.reverse();
        segments.join(":")
    }

    /// Breadth-first traversal of the subtree starting at `start`.
    pub fn walk(&self, start: AccountId) -> Walk<'_> {
        Walk {
            book: self,
            queue: VecDeque::from([start]),
        }
    }

    /// Breadth-first traversal with pruning.
    ///
    /// The callback receives a copy of each account's children. Removing
    /// entries from it skips those subtrees; the tree itself is never
    /// modified.
    pub fn visit<F>(&self, start: AccountId, mut f: F)
    where
        F: FnMut(AccountId, &Account, &mut Vec<AccountId>, &[SplitId]),
    {
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            let account = &self.accounts[id.0];
            let mut children = account.children.clone();
            f(id, account, &mut children, &account.splits);
            queue.extend(children);
        }
    }

    /// First account named `name`, in breadth-first order from the root.
    pub fn find_account(&self, name: &str) -> Option<AccountId> {
        self.walk(self.root)
            .find(|entry| entry.account.name == name)
            .map(|entry| entry.id)
    }

    /// Account with the given identifier.
    pub fn account_by_guid(&self, guid: &str) -> Option<AccountId> {
        self.accounts().find(|(_, a)| a.guid == guid).map(|(id, _)| id)
    }

    /// Transaction with the given identifier.
    pub fn transaction_by_guid(&self, guid: &str) -> Option<TransactionId> {
        self.transactions()
            .find(|(_, t)| t.guid == guid)
            .map(|(id, _)| id)
    }

    /// Account or transaction with the given identifier.
    pub fn find_guid(&self, guid: &str) -> Option<GuidRef> {
        self.account_by_guid(guid)
            .map(GuidRef::Account)
            .or_else(|| self.transaction_by_guid(guid).map(GuidRef::Transaction))
    }

    /// Splits of the subtree at `start`, ordered by posting date.
    ///
    /// Ties are broken by transaction document position; splits of one
    /// transaction keep their insertion order.
    pub fn subtree_splits(&self, start: AccountId) -> Vec<SplitId> {
        let mut splits: Vec<SplitId> = self
            .walk(start)
            .flat_map(|entry| entry.splits.iter().copied())
            .collect();
        splits.sort_by(|a, b| {
            let ta = &self.transactions[self.splits[a.0].transaction.0];
            let tb = &self.transactions[self.splits[b.0].transaction.0];
            ta.date_posted
                .cmp(&tb.date_posted)
                .then(self.splits[a.0].transaction.cmp(&self.splits[b.0].transaction))
                .then(a.cmp(b))
        });
        splits
    }
}

impl Index<AccountId> for Book {
    type Output = Account;

    fn index(&self, id: AccountId) -> &Self::Output {
        &self.accounts[id.0]
    }
}

impl Index<TransactionId> for Book {
    type Output = Transaction;

    fn index(&self, id: TransactionId) -> &Self::Output {
        &self.transactions[id.0]
    }
}

impl Index<SplitId> for Book {
    type Output = Split;

    fn index(&self, id: SplitId) -> &Self::Output {
        &self.splits[id.0]
    }
}

impl Index<CommodityId> for Book {
    type Output = Commodity;

    fn index(&self, id: CommodityId) -> &Self::Output {
        &self.commodities[id]
    }
}

/// One step of a [`Walk`].
#[derive(Debug, Clone)]
pub struct WalkEntry<'a> {
    /// Handle of the visited account.
    pub id: AccountId,
    /// The visited account.
    pub account: &'a Account,
    /// Snapshot of the direct children; owned by the caller.
    pub children: Vec<AccountId>,
    /// Splits posted to the account.
    pub splits: &'a [SplitId],
}

/// Breadth-first iterator over an account subtree.
#[derive(Debug)]
pub struct Walk<'a> {
    book: &'a Book,
    queue: VecDeque<AccountId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let account = &self.book.accounts[id.0];
        self.queue.extend(account.children.iter().copied());
        Some(WalkEntry {
            id,
            account,
            children: account.children.clone(),
            splits: &account.splits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z").unwrap()
    }

    fn amount(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    /// Root -> Assets -> {Bank, Cash}, Root -> Expenses
    fn sample() -> (Book, [AccountId; 5]) {
        let mut b = BookBuilder::new();
        let eur = b
            .commodities_mut()
            .declare(Commodity::new("ISO4217", "EUR"));
        let root = b.push_account(Account::new("r", "Root Account", "ROOT"));
        let account = |guid: &str, name: &str, kind: &str| {
            Account::new(guid, name, kind).with_commodity(eur, Some(100))
        };
        let assets = b.push_account(account("a", "Assets", "ASSET"));
        let bank = b.push_account(account("b", "Bank", "BANK"));
        let cash = b.push_account(account("c", "Cash", "CASH"));
        let expenses = b.push_account(account("e", "Expenses", "EXPENSE"));
        b.set_parent(assets, root);
        b.set_parent(bank, assets);
        b.set_parent(cash, assets);
        b.set_parent(expenses, root);

        let later = b.push_transaction(Transaction::new(
            "t1",
            eur,
            date("2024-02-01 00:00:00 +0000"),
            date("2024-02-01 00:00:00 +0000"),
            "later",
        ));
        let earlier = b.push_transaction(Transaction::new(
            "t2",
            eur,
            date("2024-01-01 00:00:00 +0000"),
            date("2024-01-01 00:00:00 +0000"),
            "earlier",
        ));
        b.push_split(Split::new("s1", later, bank, amount(-10), amount(-10)));
        b.push_split(Split::new("s2", later, expenses, amount(10), amount(10)));
        b.push_split(Split::new("s3", earlier, cash, amount(-5), amount(-5)));
        b.push_split(Split::new("s4", earlier, bank, amount(5), amount(5)));

        let book = b.finish("book", root, Slots::new());
        (book, [root, assets, bank, cash, expenses])
    }

    #[test]
    fn test_full_name_skips_root() {
        let (book, [root, assets, bank, _, _]) = sample();
        assert_eq!(book.full_name(root), "");
        assert_eq!(book.full_name(assets), "Assets");
        assert_eq!(book.full_name(bank), "Assets:Bank");
    }

    #[test]
    fn test_walk_is_breadth_first() {
        let (book, [root, assets, bank, cash, expenses]) = sample();
        let order: Vec<AccountId> = book.walk(root).map(|e| e.id).collect();
        assert_eq!(order, vec![root, assets, expenses, bank, cash]);
    }

    #[test]
    fn test_walk_children_snapshot_is_detached() {
        let (book, [root, assets, _, _, expenses]) = sample();
        let mut first = book.walk(root).next().unwrap();
        assert_eq!(first.children, vec![assets, expenses]);
        first.children.clear();
        assert_eq!(book[root].children(), &[assets, expenses]);
    }

    #[test]
    fn test_visit_prunes_removed_children() {
        let (book, [root, assets, _, _, expenses]) = sample();
        let mut seen = Vec::new();
        book.visit(root, |id, _, children, _| {
            seen.push(id);
            children.retain(|&c| c != assets);
        });
        assert_eq!(seen, vec![root, expenses]);
        assert_eq!(book[root].children().len(), 2);
    }

    #[test]
    fn test_split_shared_between_account_and_transaction() {
        let (book, _) = sample();
        for (id, split) in book.splits() {
            assert!(book[split.account()].splits().contains(&id));
            assert!(book[split.transaction()].splits().contains(&id));
        }
    }

    #[test]
    fn test_subtree_splits_sorted_by_date() {
        let (book, [_, assets, _, _, _]) = sample();
        let guids: Vec<&str> = book
            .subtree_splits(assets)
            .into_iter()
            .map(|id| book[id].guid.as_str())
            .collect();
        // s3 and s4 share the earlier transaction and keep insertion order.
        assert_eq!(guids, vec!["s3", "s4", "s1"]);
    }

    #[test]
    fn test_subtree_splits_of_one_transaction_follow_insertion_order() {
        let mut b = BookBuilder::new();
        let eur = b
            .commodities_mut()
            .declare(Commodity::new("ISO4217", "EUR"));
        let root = b.push_account(Account::new("r", "Root Account", "ROOT"));
        let parent = b.push_account(Account::new("p", "Parent", "ASSET"));
        let first_child = b.push_account(Account::new("a", "A", "ASSET"));
        let second_child = b.push_account(Account::new("b", "B", "ASSET"));
        b.set_parent(parent, root);
        b.set_parent(first_child, parent);
        b.set_parent(second_child, parent);

        let when = date("2024-03-01 00:00:00 +0000");
        let txn = b.push_transaction(Transaction::new("t", eur, when, when, "transfer"));
        b.push_split(Split::new("first", txn, second_child, amount(1), amount(1)));
        b.push_split(Split::new("second", txn, first_child, amount(-1), amount(-1)));
        let book = b.finish("book", root, Slots::new());

        let guids: Vec<&str> = book
            .subtree_splits(parent)
            .into_iter()
            .map(|id| book[id].guid.as_str())
            .collect();
        assert_eq!(guids, vec!["first", "second"]);
    }

    #[test]
    fn test_lookups() {
        let (book, [_, _, bank, _, _]) = sample();
        assert_eq!(book.find_account("Bank"), Some(bank));
        assert_eq!(book.find_account("Nope"), None);
        assert_eq!(book.account_by_guid("b"), Some(bank));
        assert_eq!(book.find_guid("b"), Some(GuidRef::Account(bank)));
        assert!(matches!(book.find_guid("t2"), Some(GuidRef::Transaction(_))));
        assert_eq!(book.find_guid("zzz"), None);
    }

    #[test]
    fn test_set_parent_moves_child() {
        let mut b = BookBuilder::new();
        let root = b.push_account(Account::new("r", "Root", "ROOT"));
        let a = b.push_account(Account::new("a", "A", "ASSET"));
        let c = b.push_account(Account::new("c", "C", "ASSET"));
        b.set_parent(c, root);
        b.set_parent(c, a);
        assert!(b.account(root).children().is_empty());
        assert_eq!(b.account(a).children(), &[c]);
        assert_eq!(b.account(c).parent(), Some(a));
    }
}
