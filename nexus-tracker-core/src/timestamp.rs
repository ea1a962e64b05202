//! Decimal timestamps as found in `maven-metadata.xml` (`yyyyMMddHHmmss`).
//!
//! Values are kept as their original digit strings so they round-trip through
//! the tracking file untouched, and are ordered numerically by their
//! significant digits. No width limit applies.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(String);

impl Timestamp {
    /// Accepts a non-empty run of ASCII digits, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, TrackerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TrackerError::parse(
                "timestamp",
                format!("expected decimal digits, got {raw:?}"),
            ));
        }
        Ok(Timestamp(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn significant(&self) -> &str {
        let stripped = self.0.trim_start_matches('0');
        if stripped.is_empty() {
            "0"
        } else {
            stripped
        }
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl TryFrom<String> for Timestamp {
    type Error = TrackerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Timestamp::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_numerically_not_lexicographically() {
        let short = Timestamp::parse("9").unwrap();
        let long = Timestamp::parse("10").unwrap();
        assert!(short < long);
    }

    #[test]
    fn leading_zeros_do_not_change_value_but_are_kept() {
        let padded = Timestamp::parse("0020230101000000").unwrap();
        let plain = Timestamp::parse("20230101000000").unwrap();
        assert_eq!(padded, plain);
        assert_eq!(padded.as_str(), "0020230101000000");
    }

    #[test]
    fn rejects_non_digits() {
        assert!(Timestamp::parse("2023-01-01").is_err());
        assert!(Timestamp::parse("").is_err());
        assert!(Timestamp::parse("1.5e10").is_err());
    }

    #[test]
    fn compares_beyond_u128_range() {
        let a = Timestamp::parse("123456789012345678901234567890123456789012").unwrap();
        let b = Timestamp::parse("123456789012345678901234567890123456789013").unwrap();
        assert!(a < b);
    }
}
