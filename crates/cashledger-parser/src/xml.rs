//! Namespaces, element names and tree navigation helpers.

use roxmltree::Node;
use std::fmt;
use std::str::FromStr;

use crate::DecodeError;

/// Namespace URIs of the GnuCash v2 XML format.
pub mod ns {
    /// `gnc:`
    pub const GNC: &str = "http://www.gnucash.org/XML/gnc";
    /// `book:`
    pub const BOOK: &str = "http://www.gnucash.org/XML/book";
    /// `cd:` (count data)
    pub const CD: &str = "http://www.gnucash.org/XML/cd";
    /// `act:`
    pub const ACT: &str = "http://www.gnucash.org/XML/act";
    /// `trn:`
    pub const TRN: &str = "http://www.gnucash.org/XML/trn";
    /// `split:`
    pub const SPLIT: &str = "http://www.gnucash.org/XML/split";
    /// `price:`
    pub const PRICE: &str = "http://www.gnucash.org/XML/price";
    /// `cmdty:`
    pub const CMDTY: &str = "http://www.gnucash.org/XML/cmdty";
    /// `slot:`
    pub const SLOT: &str = "http://www.gnucash.org/XML/slot";
    /// `ts:`
    pub const TS: &str = "http://www.gnucash.org/XML/ts";
}

/// An element name: optional namespace plus local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tag {
    ns: Option<(&'static str, &'static str)>,
    name: &'static str,
}

impl Tag {
    const fn qualified(prefix: &'static str, uri: &'static str, name: &'static str) -> Self {
        Self {
            ns: Some((prefix, uri)),
            name,
        }
    }

    /// An element without namespace (`slot`, `price`, `gnc-v2`, ...).
    pub(crate) const fn local(name: &'static str) -> Self {
        Self { ns: None, name }
    }

    pub(crate) const fn gnc(name: &'static str) -> Self {
        Self::qualified("gnc", ns::GNC, name)
    }

    pub(crate) const fn book(name: &'static str) -> Self {
        Self::qualified("book", ns::BOOK, name)
    }

    pub(crate) const fn act(name: &'static str) -> Self {
        Self::qualified("act", ns::ACT, name)
    }

    pub(crate) const fn trn(name: &'static str) -> Self {
        Self::qualified("trn", ns::TRN, name)
    }

    pub(crate) const fn split(name: &'static str) -> Self {
        Self::qualified("split", ns::SPLIT, name)
    }

    pub(crate) const fn price(name: &'static str) -> Self {
        Self::qualified("price", ns::PRICE, name)
    }

    pub(crate) const fn cmdty(name: &'static str) -> Self {
        Self::qualified("cmdty", ns::CMDTY, name)
    }

    pub(crate) const fn slot(name: &'static str) -> Self {
        Self::qualified("slot", ns::SLOT, name)
    }

    pub(crate) const fn ts(name: &'static str) -> Self {
        Self::qualified("ts", ns::TS, name)
    }

    /// Check whether `node` is an element with this name.
    pub(crate) fn matches(self, node: Node<'_, '_>) -> bool {
        node.is_element()
            && node.tag_name().name() == self.name
            && node.tag_name().namespace() == self.ns.map(|(_, uri)| uri)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ns {
            Some((prefix, _)) => write!(f, "{prefix}:{}", self.name),
            None => f.write_str(self.name),
        }
    }
}

/// First child element named `tag`.
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, tag: Tag) -> Option<Node<'a, 'input>> {
    node.children().find(|n| tag.matches(*n))
}

/// All child elements named `tag`, in document order.
pub(crate) fn children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: Tag,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| tag.matches(*n))
}

/// First child element named `tag`, or [`DecodeError::MissingElement`].
pub(crate) fn required<'a, 'input>(
    node: Node<'a, 'input>,
    tag: Tag,
) -> Result<Node<'a, 'input>, DecodeError> {
    child(node, tag).ok_or_else(|| DecodeError::MissingElement {
        parent: node.tag_name().name().to_string(),
        element: tag.to_string(),
        line: line_of(node),
    })
}

/// Text content of an element; empty elements read as `""`.
pub(crate) fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or("")
}

/// Text of the required child `tag`.
pub(crate) fn required_text<'a>(node: Node<'a, '_>, tag: Tag) -> Result<&'a str, DecodeError> {
    required(node, tag).map(text)
}

/// Text of the optional child `tag`.
pub(crate) fn optional_text(node: Node<'_, '_>, tag: Tag) -> Option<String> {
    child(node, tag).map(|n| text(n).to_string())
}

/// Parse an integer element text into any integer type.
pub(crate) fn parse_integer<T: FromStr>(literal: &str) -> Result<T, DecodeError> {
    literal
        .trim()
        .parse()
        .map_err(|_| DecodeError::MalformedNumber {
            literal: literal.to_string(),
        })
}

/// 1-based line of the element start.
pub(crate) fn line_of(node: Node<'_, '_>) -> u32 {
    node.document().text_pos_at(node.range().start).row
}
