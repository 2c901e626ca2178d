//! Slot metadata.
//!
//! Slots are the free-form key/value metadata GnuCash attaches to books,
//! accounts, transactions and splits. Values are dynamically typed and may
//! nest: a `frame` holds another slot map, a `list` holds a sequence of maps.

use chrono::{DateTime, FixedOffset, NaiveDate};
use num_bigint::BigInt;
use num_rational::BigRational;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::value::format_rational;

/// A slot container: key to value, keys unique.
pub type Slots = BTreeMap<String, SlotValue>;

/// A decoded slot value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SlotValue {
    /// Whole number (`integer` and `double` slots)
    Integer(BigInt),
    /// Exact rational (`numeric` slots)
    Numeric(BigRational),
    /// Text (`string` slots)
    String(String),
    /// GUID reference (`guid` slots)
    Guid(String),
    /// Calendar date (`gdate` slots)
    Date(NaiveDate),
    /// Point in time (`timespec` slots)
    Timestamp(DateTime<FixedOffset>),
    /// Nested container (`frame` slots)
    Frame(Slots),
    /// Ordered sequence of containers (`list` slots)
    List(Vec<Slots>),
}

impl SlotValue {
    /// The slot type name as written in the file format.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Numeric(_) => "numeric",
            Self::String(_) => "string",
            Self::Guid(_) => "guid",
            Self::Date(_) => "gdate",
            Self::Timestamp(_) => "timespec",
            Self::Frame(_) => "frame",
            Self::List(_) => "list",
        }
    }

    /// Get the text of a `string` or `guid` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Guid(s) => Some(s),
            _ => None,
        }
    }

    /// Get the nested container of a `frame` value.
    pub const fn as_frame(&self) -> Option<&Slots> {
        match self {
            Self::Frame(slots) => Some(slots),
            _ => None,
        }
    }

    /// Get the containers of a `list` value.
    pub fn as_list(&self) -> Option<&[Slots]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the rational of a `numeric` value.
    pub const fn as_numeric(&self) -> Option<&BigRational> {
        match self {
            Self::Numeric(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Numeric(n) => write!(f, "{}", format_rational(n)),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Guid(g) => write!(f, "{g}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Timestamp(t) => write!(f, "{t}"),
            Self::Frame(slots) => write_frame(f, slots),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_frame(f, item)?;
                }
                write!(f, "]")
            }
        }
    }
}

fn write_frame(f: &mut fmt::Formatter<'_>, slots: &Slots) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in slots.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{key}: {value}")?;
    }
    write!(f, "}}")
}

/// Look up a value by a `/`-separated path through nested frames.
///
/// GnuCash itself addresses nested slots this way, e.g.
/// `"options/Accounts/Use Trading Accounts"`.
pub fn lookup<'a>(slots: &'a Slots, path: &str) -> Option<&'a SlotValue> {
    let mut segments = path.split('/');
    let mut current = slots.get(segments.next()?)?;
    for segment in segments {
        current = current.as_frame()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let mut inner = Slots::new();
        inner.insert(
            "k".to_string(),
            SlotValue::Numeric(BigRational::from_integer(BigInt::from(5))),
        );
        let mut outer = Slots::new();
        outer.insert("frame".to_string(), SlotValue::Frame(inner.clone()));
        outer.insert("list".to_string(), SlotValue::List(vec![inner.clone(), inner]));

        let rendered = SlotValue::Frame(outer).to_string();
        assert_eq!(rendered, "{frame: {k: 5/1}, list: [{k: 5/1}, {k: 5/1}]}");
    }

    #[test]
    fn test_lookup_path() {
        let mut leaf = Slots::new();
        leaf.insert("Use Trading Accounts".to_string(), SlotValue::String("t".to_string()));
        let mut accounts = Slots::new();
        accounts.insert("Accounts".to_string(), SlotValue::Frame(leaf));
        let mut root = Slots::new();
        root.insert("options".to_string(), SlotValue::Frame(accounts));

        let value = lookup(&root, "options/Accounts/Use Trading Accounts").unwrap();
        assert_eq!(value.as_str(), Some("t"));
        assert!(lookup(&root, "options/Missing").is_none());
        assert!(lookup(&root, "options/Accounts/Use Trading Accounts/deeper").is_none());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(SlotValue::Integer(BigInt::from(1)).type_name(), "integer");
        assert_eq!(SlotValue::Guid(String::new()).type_name(), "guid");
        assert_eq!(SlotValue::List(Vec::new()).type_name(), "list");
    }
}
