//! Timestamp and calendar date parsing.
//!
//! `ts:date` elements hold timestamps such as `2014-01-02 10:59:00 +0100`.
//! Older files occasionally omit the offset or the time; those read as UTC
//! and midnight respectively. `gdate` elements hold a bare `YYYY-MM-DD`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use roxmltree::Node;

use crate::xml::{required, required_text, Tag};
use crate::DecodeError;

const TS_DATE: Tag = Tag::ts("date");

fn malformed(literal: &str) -> DecodeError {
    DecodeError::MalformedDate {
        literal: literal.to_string(),
    }
}

/// Parse a `ts:date` timestamp.
pub fn parse_timestamp(literal: &str) -> Result<DateTime<FixedOffset>, DecodeError> {
    let s = literal.trim();
    if let Ok(ts) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Ok(ts);
    }

    let utc = Utc.fix();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(utc.from_utc_datetime(&date.and_time(NaiveTime::default())));
    }

    Err(malformed(literal))
}

/// Parse the `ts:date` inside the required child `tag` of `node`.
pub(crate) fn timestamp_in(
    node: Node<'_, '_>,
    tag: Tag,
) -> Result<DateTime<FixedOffset>, DecodeError> {
    parse_timestamp(required_text(required(node, tag)?, TS_DATE)?)
}

/// Parse a `gdate` calendar date.
pub fn parse_gdate(literal: &str) -> Result<NaiveDate, DecodeError> {
    NaiveDate::parse_from_str(literal.trim(), "%Y-%m-%d").map_err(|_| malformed(literal))
}
