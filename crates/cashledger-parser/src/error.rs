//! Decode error types.

use cashledger_core::MalformedNumber;
use thiserror::Error;

/// Errors that abort decoding a document.
///
/// Decoding fails fast: the first error encountered is returned and no
/// partial book is produced.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not well-formed XML.
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document does not have the shape of a GnuCash v2 book file.
    #[error("invalid document: {reason}")]
    InvalidDocument {
        /// What is wrong with the document.
        reason: String,
    },

    /// A rational or integer literal could not be parsed.
    #[error("malformed number {literal:?}")]
    MalformedNumber {
        /// The offending literal.
        literal: String,
    },

    /// A date or timestamp could not be parsed.
    #[error("malformed date {literal:?}")]
    MalformedDate {
        /// The offending literal.
        literal: String,
    },

    /// A required child element is absent.
    #[error("<{parent}> at line {line} is missing required element <{element}>")]
    MissingElement {
        /// Local name of the element that should contain the child.
        parent: String,
        /// Qualified name of the missing child.
        element: String,
        /// Line of the parent element.
        line: u32,
    },

    /// A slot value declares a type outside the recognized set.
    #[error("unknown slot type {slot_type:?} for key {key:?}")]
    UnknownSlotType {
        /// The declared type attribute.
        slot_type: String,
        /// The slot key.
        key: String,
    },

    /// An account GUID does not match any decoded account.
    #[error("reference to unknown account {guid}")]
    UnresolvedAccountReference {
        /// The unmatched GUID.
        guid: String,
    },

    /// A commodity reference does not match any registered commodity.
    #[error("reference to unknown commodity {namespace}:{symbol}")]
    UnresolvedCommodityReference {
        /// Commodity namespace.
        namespace: String,
        /// Commodity symbol.
        symbol: String,
    },

    /// No account of type `ROOT` was declared.
    #[error("book has no ROOT account")]
    MissingRootAccount,
}

impl DecodeError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Get a numeric code for the error kind.
    #[must_use]
    pub const fn kind_code(&self) -> u32 {
        match self {
            Self::Xml(_) => 1,
            Self::InvalidDocument { .. } => 2,
            Self::MalformedNumber { .. } => 3,
            Self::MalformedDate { .. } => 4,
            Self::MissingElement { .. } => 5,
            Self::UnknownSlotType { .. } => 6,
            Self::UnresolvedAccountReference { .. } => 7,
            Self::UnresolvedCommodityReference { .. } => 8,
            Self::MissingRootAccount => 9,
        }
    }

    /// Get a short label for the error.
    #[must_use]
    pub const fn label(&self) -> &str {
        match self {
            Self::Xml(_) => "invalid XML",
            Self::InvalidDocument { .. } => "invalid document",
            Self::MalformedNumber { .. } => "malformed number",
            Self::MalformedDate { .. } => "malformed date",
            Self::MissingElement { .. } => "missing element",
            Self::UnknownSlotType { .. } => "unknown slot type",
            Self::UnresolvedAccountReference { .. } => "unknown account",
            Self::UnresolvedCommodityReference { .. } => "unknown commodity",
            Self::MissingRootAccount => "missing root account",
        }
    }
}

impl From<MalformedNumber> for DecodeError {
    fn from(err: MalformedNumber) -> Self {
        Self::MalformedNumber {
            literal: err.literal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_number_conversion() {
        let err: DecodeError = cashledger_core::parse_rational("1/2/3").unwrap_err().into();
        assert!(matches!(err, DecodeError::MalformedNumber { ref literal } if literal == "1/2/3"));
        assert_eq!(err.kind_code(), 3);
    }

    #[test]
    fn test_display() {
        let err = DecodeError::MissingElement {
            parent: "account".to_string(),
            element: "act:name".to_string(),
            line: 12,
        };
        assert_eq!(
            err.to_string(),
            "<account> at line 12 is missing required element <act:name>"
        );
        assert_eq!(
            DecodeError::UnresolvedCommodityReference {
                namespace: "ISO4217".to_string(),
                symbol: "XXX".to_string(),
            }
            .to_string(),
            "reference to unknown commodity ISO4217:XXX"
        );
    }
}
