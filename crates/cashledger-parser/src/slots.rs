//! Slot metadata decoding.
//!
//! ```text
//! <act:slots>
//!   <slot>
//!     <slot:key>placeholder</slot:key>
//!     <slot:value type="string">true</slot:value>
//!   </slot>
//!   <slot>
//!     <slot:key>hbci</slot:key>
//!     <slot:value type="frame">
//!       <slot>...</slot>
//!     </slot:value>
//!   </slot>
//! </act:slots>
//! ```
//!
//! Nesting is handled with an explicit stack, so pathological documents
//! cannot exhaust the native stack.

use cashledger_core::{parse_rational, SlotValue, Slots};
use roxmltree::Node;

use crate::date::{parse_gdate, parse_timestamp};
use crate::xml::{children, parse_integer, required, required_text, text, Tag};
use crate::DecodeError;

const SLOT: Tag = Tag::local("slot");
const GDATE: Tag = Tag::local("gdate");
const SLOT_KEY: Tag = Tag::slot("key");
const SLOT_VALUE: Tag = Tag::slot("value");
const TS_DATE: Tag = Tag::ts("date");

type NodeIter<'a, 'input> = std::vec::IntoIter<Node<'a, 'input>>;

/// Where a finished container goes.
enum Dest {
    Root,
    Key(String),
    ListItem,
}

enum Frame<'a, 'input> {
    Map {
        slots: NodeIter<'a, 'input>,
        acc: Slots,
        dest: Dest,
    },
    List {
        items: NodeIter<'a, 'input>,
        acc: Vec<Slots>,
        key: String,
    },
}

impl<'a, 'input> Frame<'a, 'input> {
    fn map(container: Node<'a, 'input>, dest: Dest) -> Self {
        Self::Map {
            slots: children(container, SLOT).collect::<Vec<_>>().into_iter(),
            acc: Slots::new(),
            dest,
        }
    }

    fn list(value: Node<'a, 'input>, key: String) -> Self {
        Self::List {
            items: children(value, SLOT_VALUE).collect::<Vec<_>>().into_iter(),
            acc: Vec::new(),
            key,
        }
    }
}

/// Result of reading one `<slot>`: either a finished value or a nested
/// container that has to be decoded first.
enum Step<'a, 'input> {
    Value(String, SlotValue),
    Descend(Frame<'a, 'input>),
}

/// Decode a slot container.
///
/// An absent container decodes to an empty map. Duplicate keys within one
/// container keep the last value.
pub fn decode_slots(container: Option<Node<'_, '_>>) -> Result<Slots, DecodeError> {
    let Some(container) = container else {
        return Ok(Slots::new());
    };

    let mut stack = vec![Frame::map(container, Dest::Root)];
    loop {
        let next = match stack.last_mut() {
            Some(Frame::Map { slots, acc, .. }) => match slots.next() {
                Some(slot) => match read_slot(slot)? {
                    Step::Value(key, value) => {
                        insert(acc, key, value);
                        continue;
                    }
                    Step::Descend(frame) => Some(frame),
                },
                None => None,
            },
            Some(Frame::List { items, .. }) => {
                items.next().map(|item| Frame::map(item, Dest::ListItem))
            }
            None => return Ok(Slots::new()),
        };

        if let Some(frame) = next {
            stack.push(frame);
            continue;
        }

        // The top frame is exhausted: hand its result to the parent.
        match stack.pop() {
            Some(Frame::Map { acc, dest, .. }) => match dest {
                Dest::Root => return Ok(acc),
                Dest::Key(key) => insert_into_parent(&mut stack, key, SlotValue::Frame(acc)),
                Dest::ListItem => {
                    if let Some(Frame::List { acc: items, .. }) = stack.last_mut() {
                        items.push(acc);
                    }
                }
            },
            Some(Frame::List { acc, key, .. }) => {
                insert_into_parent(&mut stack, key, SlotValue::List(acc));
            }
            None => return Ok(Slots::new()),
        }
    }
}

fn insert(slots: &mut Slots, key: String, value: SlotValue) {
    if let Some(previous) = slots.insert(key, value) {
        tracing::warn!(
            previous_type = previous.type_name(),
            "duplicate slot key, keeping the last value"
        );
    }
}

fn insert_into_parent(stack: &mut [Frame<'_, '_>], key: String, value: SlotValue) {
    if let Some(Frame::Map { acc, .. }) = stack.last_mut() {
        insert(acc, key, value);
    }
}

fn read_slot<'a, 'input>(slot: Node<'a, 'input>) -> Result<Step<'a, 'input>, DecodeError> {
    let key = required_text(slot, SLOT_KEY)?.to_string();
    let value = required(slot, SLOT_VALUE)?;
    let slot_type = value.attribute("type").unwrap_or("string");

    let decoded = match slot_type {
        "integer" | "double" => SlotValue::Integer(parse_integer(text(value))?),
        "numeric" => SlotValue::Numeric(parse_rational(text(value))?),
        "string" => SlotValue::String(text(value).to_string()),
        "guid" => SlotValue::Guid(text(value).to_string()),
        "gdate" => SlotValue::Date(parse_gdate(required_text(value, GDATE)?)?),
        "timespec" => SlotValue::Timestamp(parse_timestamp(required_text(value, TS_DATE)?)?),
        "frame" => return Ok(Step::Descend(Frame::map(value, Dest::Key(key)))),
        "list" => return Ok(Step::Descend(Frame::list(value, key))),
        other => {
            return Err(DecodeError::UnknownSlotType {
                slot_type: other.to_string(),
                key,
            })
        }
    };
    Ok(Step::Value(key, decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use roxmltree::Document;

    fn decode(xml: &str) -> Result<Slots, DecodeError> {
        let wrapped = format!(
            r#"<slots xmlns:slot="http://www.gnucash.org/XML/slot" xmlns:ts="http://www.gnucash.org/XML/ts">{xml}</slots>"#
        );
        let doc = Document::parse(&wrapped).unwrap();
        decode_slots(Some(doc.root_element()))
    }

    fn slot(key: &str, ty: &str, body: &str) -> String {
        format!(r#"<slot><slot:key>{key}</slot:key><slot:value type="{ty}">{body}</slot:value></slot>"#)
    }

    #[test]
    fn test_absent_container_is_empty() {
        assert!(decode_slots(None).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_types() {
        let xml = [
            slot("i", "integer", "42"),
            slot("d", "double", "-7"),
            slot("n", "numeric", "10/4"),
            slot("s", "string", " padded "),
            slot("g", "guid", "0123abcd"),
            slot("gd", "gdate", "<gdate>2016-05-01</gdate>"),
            slot("ts", "timespec", "<ts:date>2016-05-01 12:00:00 +0000</ts:date>"),
        ]
        .concat();
        let slots = decode(&xml).unwrap();

        assert_eq!(slots["i"], SlotValue::Integer(BigInt::from(42)));
        assert_eq!(slots["d"], SlotValue::Integer(BigInt::from(-7)));
        assert_eq!(
            slots["n"],
            SlotValue::Numeric(BigRational::new(BigInt::from(5), BigInt::from(2)))
        );
        assert_eq!(slots["s"], SlotValue::String(" padded ".to_string()));
        assert_eq!(slots["g"], SlotValue::Guid("0123abcd".to_string()));
        assert_eq!(
            slots["gd"],
            SlotValue::Date(NaiveDate::from_ymd_opt(2016, 5, 1).unwrap())
        );
        assert!(matches!(slots["ts"], SlotValue::Timestamp(_)));
    }

    #[test]
    fn test_integers_beyond_64_bits() {
        let xml = [
            slot("big", "double", "99999999999999999999"),
            slot("small", "integer", "-170141183460469231731687303715884105728"),
        ]
        .concat();
        let slots = decode(&xml).unwrap();

        let big: BigInt = "99999999999999999999".parse().unwrap();
        assert_eq!(slots["big"], SlotValue::Integer(big));
        let small: BigInt = "-170141183460469231731687303715884105728".parse().unwrap();
        assert_eq!(slots["small"], SlotValue::Integer(small));
        assert_eq!(slots["big"].to_string(), "99999999999999999999");
    }

    #[test]
    fn test_missing_type_defaults_to_string() {
        let xml = "<slot><slot:key>k</slot:key><slot:value>v</slot:value></slot>";
        assert_eq!(decode(xml).unwrap()["k"], SlotValue::String("v".to_string()));
    }

    #[test]
    fn test_frame_with_numeric() {
        let xml = slot("outer", "frame", &slot("k", "numeric", "5/1"));
        let slots = decode(&xml).unwrap();
        let inner = slots["outer"].as_frame().unwrap();
        assert_eq!(
            inner["k"],
            SlotValue::Numeric(BigRational::from_integer(BigInt::from(5)))
        );
    }

    #[test]
    fn test_list_of_frames_keeps_order() {
        let items = format!(
            r#"<slot:value type="frame">{}</slot:value><slot:value type="frame">{}</slot:value>"#,
            slot("n", "integer", "1"),
            slot("n", "integer", "2"),
        );
        let slots = decode(&slot("l", "list", &items)).unwrap();
        let list = slots["l"].as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["n"], SlotValue::Integer(BigInt::from(1)));
        assert_eq!(list[1]["n"], SlotValue::Integer(BigInt::from(2)));
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 300;
        let mut xml = String::new();
        for i in (0..depth).rev() {
            xml.push_str(&format!(
                r#"<slot><slot:key>k{i}</slot:key><slot:value type="frame">"#
            ));
        }
        xml.push_str(&slot("leaf", "integer", "1"));
        for _ in 0..depth {
            xml.push_str("</slot:value></slot>");
        }
        let slots = decode(&xml).unwrap();

        let mut current = &slots;
        for i in (0..depth).rev() {
            current = current[&format!("k{i}")].as_frame().unwrap();
        }
        assert_eq!(current["leaf"], SlotValue::Integer(BigInt::from(1)));
    }

    #[test]
    fn test_values_after_nested_frame_land_in_parent() {
        let xml = [
            slot("f", "frame", &slot("inner", "string", "x")),
            slot("after", "string", "y"),
        ]
        .concat();
        let slots = decode(&xml).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots["after"], SlotValue::String("y".to_string()));
        assert_eq!(slots["f"].as_frame().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_type_fails() {
        let err = decode(&slot("horn", "unicorn", "1")).unwrap_err();
        match err {
            DecodeError::UnknownSlotType { slot_type, key } => {
                assert_eq!(slot_type, "unicorn");
                assert_eq!(key, "horn");
            }
            other => panic!("expected UnknownSlotType, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_inside_list_fails() {
        let items = format!(
            r#"<slot:value type="frame">{}</slot:value>"#,
            slot("x", "unicorn", "1")
        );
        assert!(matches!(
            decode(&slot("l", "list", &items)),
            Err(DecodeError::UnknownSlotType { .. })
        ));
    }

    #[test]
    fn test_bad_integer_fails() {
        assert!(matches!(
            decode(&slot("i", "integer", "1.5")),
            Err(DecodeError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_duplicate_keys_keep_a_value() {
        // Duplicate keys are not defined by the format; only assert that one
        // entry survives.
        let xml = [slot("k", "integer", "1"), slot("k", "integer", "2")].concat();
        let slots = decode(&xml).unwrap();
        assert_eq!(slots.len(), 1);
    }
}
