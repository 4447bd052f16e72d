//! Lenient date input.
//!
//! The back office date pickers send plain `YYYY-MM-DD` values while API
//! clients send RFC 3339 timestamps. Both are accepted; plain dates resolve
//! to midnight UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date {0:?}: expected YYYY-MM-DD or an RFC 3339 timestamp")]
pub struct DateParseError(String);

/// Parse an RFC 3339 timestamp, a `YYYY-MM-DDTHH:MM[:SS]` local timestamp
/// (taken as UTC), or a bare `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`DateParseError`] when none of the formats match.
pub fn parse_flexible(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateParseError(input.to_owned()))
}

/// `deserialize_with` adapter for [`parse_flexible`].
///
/// # Errors
///
/// Fails when the value is not a string in one of the accepted formats.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flexible(&raw).map_err(serde::de::Error::custom)
}

/// Like [`deserialize`] for optional fields.
///
/// # Errors
///
/// Fails when a present value is not in one of the accepted formats.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_flexible(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
