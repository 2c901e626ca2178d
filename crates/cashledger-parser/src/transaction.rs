//! Transactions and their splits.

use cashledger_core::{
    parse_rational, BookBuilder, ReconcileState, Split, Transaction, TransactionId,
};
use roxmltree::Node;

use crate::account::AccountIndex;
use crate::commodity;
use crate::date::{parse_timestamp, timestamp_in};
use crate::slots::decode_slots;
use crate::xml::{child, children, optional_text, required, required_text, Tag};
use crate::DecodeError;

const TRANSACTION: Tag = Tag::gnc("transaction");
const TS_DATE: Tag = Tag::ts("date");

const TRN_ID: Tag = Tag::trn("id");
const TRN_CURRENCY: Tag = Tag::trn("currency");
const TRN_NUM: Tag = Tag::trn("num");
const TRN_DATE_POSTED: Tag = Tag::trn("date-posted");
const TRN_DATE_ENTERED: Tag = Tag::trn("date-entered");
const TRN_DESCRIPTION: Tag = Tag::trn("description");
const TRN_SLOTS: Tag = Tag::trn("slots");
const TRN_SPLITS: Tag = Tag::trn("splits");
const TRN_SPLIT: Tag = Tag::trn("split");

const SPLIT_ID: Tag = Tag::split("id");
const SPLIT_MEMO: Tag = Tag::split("memo");
const SPLIT_ACTION: Tag = Tag::split("action");
const SPLIT_RECONCILED_STATE: Tag = Tag::split("reconciled-state");
const SPLIT_RECONCILE_DATE: Tag = Tag::split("reconcile-date");
const SPLIT_VALUE: Tag = Tag::split("value");
const SPLIT_QUANTITY: Tag = Tag::split("quantity");
const SPLIT_ACCOUNT: Tag = Tag::split("account");
const SPLIT_SLOTS: Tag = Tag::split("slots");

/// Decode every `gnc:transaction` of `book`, returning how many transactions
/// and splits were added.
pub(crate) fn decode_transactions(
    book: Node<'_, '_>,
    builder: &mut BookBuilder,
    accounts: &AccountIndex,
) -> Result<(usize, usize), DecodeError> {
    let mut transactions = 0;
    let mut splits = 0;
    for node in children(book, TRANSACTION) {
        let id = decode_transaction(node, builder)?;
        transactions += 1;

        if let Some(list) = child(node, TRN_SPLITS) {
            for split in children(list, TRN_SPLIT) {
                let split = decode_split(split, id, accounts)?;
                builder.push_split(split);
                splits += 1;
            }
        }
    }
    Ok((transactions, splits))
}

fn decode_transaction(
    node: Node<'_, '_>,
    builder: &mut BookBuilder,
) -> Result<TransactionId, DecodeError> {
    let guid = required_text(node, TRN_ID)?.trim();
    let currency = commodity::resolve(required(node, TRN_CURRENCY)?, builder.commodities())?;
    let date_posted = timestamp_in(node, TRN_DATE_POSTED)?;
    let date_entered = timestamp_in(node, TRN_DATE_ENTERED)?;
    let description = required_text(node, TRN_DESCRIPTION)?;

    let mut transaction = Transaction::new(guid, currency, date_posted, date_entered, description);
    transaction.num = optional_text(node, TRN_NUM);
    transaction.slots = decode_slots(child(node, TRN_SLOTS))?;
    Ok(builder.push_transaction(transaction))
}

fn decode_split(
    node: Node<'_, '_>,
    transaction: TransactionId,
    accounts: &AccountIndex,
) -> Result<Split, DecodeError> {
    let guid = required_text(node, SPLIT_ID)?.trim();
    let value = parse_rational(required_text(node, SPLIT_VALUE)?)?;
    let quantity = parse_rational(required_text(node, SPLIT_QUANTITY)?)?;
    let account = accounts.resolve(required_text(node, SPLIT_ACCOUNT)?.trim())?;

    let mut split = Split::new(guid, transaction, account, value, quantity);
    split.memo = optional_text(node, SPLIT_MEMO);
    split.action = optional_text(node, SPLIT_ACTION);
    split.reconciled_state =
        ReconcileState::from_code(required_text(node, SPLIT_RECONCILED_STATE)?.trim());
    split.reconcile_date = child(node, SPLIT_RECONCILE_DATE)
        .map(|date| required_text(date, TS_DATE).and_then(parse_timestamp))
        .transpose()?;
    split.slots = decode_slots(child(node, SPLIT_SLOTS))?;
    Ok(split)
}
