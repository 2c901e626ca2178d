//! Account tree construction.
//!
//! Parent references may point forward in the document, so accounts are
//! decoded in one pass and linked in a second one once every account exists.

use cashledger_core::{Account, AccountId, BookBuilder};
use roxmltree::Node;
use std::collections::{HashMap, VecDeque};

use crate::commodity;
use crate::slots::decode_slots;
use crate::xml::{child, children, optional_text, parse_integer, required, required_text, Tag};
use crate::DecodeError;

const ACCOUNT: Tag = Tag::gnc("account");
const NAME: Tag = Tag::act("name");
const ID: Tag = Tag::act("id");
const TYPE: Tag = Tag::act("type");
const DESCRIPTION: Tag = Tag::act("description");
const COMMODITY: Tag = Tag::act("commodity");
const COMMODITY_SCU: Tag = Tag::act("commodity-scu");
const PARENT: Tag = Tag::act("parent");
const SLOTS: Tag = Tag::act("slots");

/// Decoded accounts, keyed for reference resolution.
#[derive(Debug)]
pub(crate) struct AccountIndex {
    pub(crate) root: AccountId,
    by_guid: HashMap<String, AccountId>,
}

impl AccountIndex {
    /// Resolve an account GUID.
    pub(crate) fn resolve(&self, guid: &str) -> Result<AccountId, DecodeError> {
        self.by_guid
            .get(guid)
            .copied()
            .ok_or_else(|| DecodeError::UnresolvedAccountReference {
                guid: guid.to_string(),
            })
    }

    pub(crate) fn len(&self) -> usize {
        self.by_guid.len()
    }
}

/// One account before linking.
struct Pending {
    account: Account,
    parent: Option<String>,
}

fn decode_account(node: Node<'_, '_>, builder: &BookBuilder) -> Result<Pending, DecodeError> {
    let name = required_text(node, NAME)?.to_string();
    let guid = required_text(node, ID)?.trim().to_string();
    let account_type = required_text(node, TYPE)?.trim().to_string();

    let mut account = Account::new(guid, name, account_type);
    account.description = optional_text(node, DESCRIPTION);
    account.slots = decode_slots(child(node, SLOTS))?;

    if account.is_root() {
        // Some writers give the root a commodity; keep it when present.
        if let Some(reference) = child(node, COMMODITY) {
            account.commodity = Some(commodity::resolve(reference, builder.commodities())?);
        }
        account.commodity_scu = optional_text(node, COMMODITY_SCU)
            .map(|text| parse_integer(&text))
            .transpose()?;
        return Ok(Pending {
            account,
            parent: None,
        });
    }

    let id = commodity::resolve(required(node, COMMODITY)?, builder.commodities())?;
    let scu = parse_integer(required_text(node, COMMODITY_SCU)?)?;
    let parent = required_text(node, PARENT)?.trim().to_string();
    Ok(Pending {
        account: account.with_commodity(id, Some(scu)),
        parent: Some(parent),
    })
}

/// Decode every `gnc:account` of `book` and link the tree.
pub(crate) fn decode_accounts(
    book: Node<'_, '_>,
    builder: &mut BookBuilder,
) -> Result<AccountIndex, DecodeError> {
    // Pass 1: decode records, keyed by GUID. A repeated GUID replaces the
    // earlier record at its original position.
    let mut pending: Vec<Pending> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for node in children(book, ACCOUNT) {
        let record = decode_account(node, builder)?;
        match positions.get(&record.account.guid) {
            Some(&at) => {
                tracing::warn!(
                    guid = %record.account.guid,
                    "duplicate account id, keeping the last declaration"
                );
                pending[at] = record;
            }
            None => {
                positions.insert(record.account.guid.clone(), pending.len());
                pending.push(record);
            }
        }
    }

    let mut roots = pending.iter().filter(|p| p.account.is_root());
    let Some(root_record) = roots.next() else {
        return Err(DecodeError::MissingRootAccount);
    };
    if let Some(second) = roots.next() {
        return Err(DecodeError::invalid(format!(
            "more than one ROOT account ({} and {})",
            root_record.account.guid, second.account.guid
        )));
    }

    let mut by_guid = HashMap::with_capacity(pending.len());
    let mut parents = Vec::with_capacity(pending.len());
    let mut root = None;
    for Pending { account, parent } in pending {
        let guid = account.guid.clone();
        let is_root = account.is_root();
        let id = builder.push_account(account);
        if is_root {
            root = Some(id);
        }
        by_guid.insert(guid, id);
        parents.push((id, parent));
    }
    let root = root.ok_or(DecodeError::MissingRootAccount)?;

    // Pass 2: link children to parents.
    let index = AccountIndex { root, by_guid };
    for (id, parent) in parents {
        if let Some(parent) = parent {
            let parent = index.resolve(&parent)?;
            builder.set_parent(id, parent);
        }
    }

    check_reachable(builder, &index)?;
    tracing::debug!(accounts = index.len(), "linked account tree");
    Ok(index)
}

/// Every account must hang below the root; anything else is a parent cycle.
fn check_reachable(builder: &BookBuilder, index: &AccountIndex) -> Result<(), DecodeError> {
    let mut seen = vec![false; builder.account_count()];
    let mut queue = VecDeque::from([index.root]);
    while let Some(id) = queue.pop_front() {
        if std::mem::replace(&mut seen[id.index()], true) {
            continue;
        }
        queue.extend(builder.account(id).children().iter().copied());
    }

    let mut stranded: Vec<&str> = index
        .by_guid
        .iter()
        .filter(|(_, id)| !seen[id.index()])
        .map(|(guid, _)| guid.as_str())
        .collect();
    if stranded.is_empty() {
        return Ok(());
    }
    stranded.sort_unstable();
    Err(DecodeError::invalid(format!(
        "accounts not reachable from the root (parent cycle): {}",
        stranded.join(", ")
    )))
}
