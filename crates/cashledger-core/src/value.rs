//! Exact rational values.
//!
//! Every monetary amount in a GnuCash book is written as a
//! `numerator/denominator` literal (`"12345/100"`). Values are kept as
//! [`BigRational`] so no precision is lost between decoding and any later
//! arithmetic; rounding happens only when a value is rendered for display.
//!
//! # Example
//!
//! ```
//! use cashledger_core::value::{format_rational, parse_rational, to_fixed};
//!
//! let value = parse_rational("-7/2").unwrap();
//! assert_eq!(format_rational(&value), "-7/2");
//! assert_eq!(to_fixed(&value, 2), "-3.50");
//! ```

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use thiserror::Error;

/// A rational literal that is not of the form `<integer>/<integer>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed number {literal:?}, expected <integer>/<integer>")]
pub struct MalformedNumber {
    /// The offending literal.
    pub literal: String,
}

impl MalformedNumber {
    fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_string(),
        }
    }
}

/// Parse a `"n/d"` literal into an exact rational.
///
/// Both sides may carry a sign. The result is reduced to lowest terms with a
/// positive denominator.
///
/// # Errors
///
/// Returns [`MalformedNumber`] when the literal does not contain exactly one
/// `/`, when either side is not an integer, or when the denominator is zero.
pub fn parse_rational(literal: &str) -> Result<BigRational, MalformedNumber> {
    let mut parts = literal.trim().split('/');
    let (Some(numer), Some(denom), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(MalformedNumber::new(literal));
    };

    let numer: BigInt = numer.parse().map_err(|_| MalformedNumber::new(literal))?;
    let denom: BigInt = denom.parse().map_err(|_| MalformedNumber::new(literal))?;
    if denom.is_zero() {
        return Err(MalformedNumber::new(literal));
    }

    Ok(BigRational::new(numer, denom))
}

/// Render a rational as `"n/d"` in lowest terms.
///
/// Unlike the `Display` impl of [`BigRational`], the denominator is always
/// written, so the output parses back through [`parse_rational`].
pub fn format_rational(value: &BigRational) -> String {
    format!("{}/{}", value.numer(), value.denom())
}

/// Render a rational as a fixed-point decimal string.
///
/// The value is rounded half away from zero to `places` fractional digits.
pub fn to_fixed(value: &BigRational, places: u32) -> String {
    let scale = BigRational::from_integer(BigInt::from(10u32).pow(places));
    let scaled = (value * scale).round().to_integer();

    let sign = if scaled.is_negative() { "-" } else { "" };
    let digits = scaled.abs().to_string();
    if places == 0 {
        return format!("{sign}{digits}");
    }

    let places = places as usize;
    let padded = format!("{digits:0>width$}", width = places + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - places);
    format!("{sign}{int_part}.{frac_part}")
}
