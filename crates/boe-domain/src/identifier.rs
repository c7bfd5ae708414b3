//! Identifier module - upstream document identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier of a consolidated law
///
/// Dash-delimited: `BOE-<letter>-<year>-<number>`, e.g. `BOE-A-2015-10566`.
/// Only the format is checked here; whether the document exists is decided
/// by the upstream response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LawId(String);

impl LawId {
    /// Create a new law identifier
    ///
    /// # Errors
    /// Returns error if the value does not match `BOE-[A-Z]-YYYY-N{1,5}`
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "Invalid law identifier '{}': expected format BOE-A-YYYY-NNNNN",
                value
            ))
        }
    }

    /// Check the identifier format without allocating
    pub fn is_valid(value: &str) -> bool {
        let mut parts = value.split('-');
        let (Some(prefix), Some(letter), Some(year), Some(number), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };

        prefix == "BOE"
            && letter.len() == 1
            && letter.bytes().all(|b| b.is_ascii_uppercase())
            && year.len() == 4
            && year.bytes().all(|b| b.is_ascii_digit())
            && (1..=5).contains(&number.len())
            && number.bytes().all(|b| b.is_ascii_digit())
    }

    /// Get identifier as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Publication year encoded in the identifier
    pub fn year(&self) -> u32 {
        // Format was validated on construction
        self.0[6..10].parse().unwrap_or_default()
    }
}

impl fmt::Display for LawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LawId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LawId> for String {
    fn from(id: LawId) -> Self {
        id.0
    }
}

impl std::str::FromStr for LawId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(LawId::is_valid("BOE-A-1978-31229"));
        assert!(LawId::is_valid("BOE-A-2015-10566"));
        assert!(LawId::is_valid("BOE-B-2000-1"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!LawId::is_valid(""));
        assert!(!LawId::is_valid("BOE-a-1978-31229"));
        assert!(!LawId::is_valid("BOE-A-78-31229"));
        assert!(!LawId::is_valid("BOE-A-1978-312290"));
        assert!(!LawId::is_valid("BORME-A-1978-1"));
        assert!(!LawId::is_valid("BOE-A-1978-31229-x"));
        assert!(!LawId::is_valid("BOE-AB-1978-1"));
    }

    #[test]
    fn test_year() {
        let id = LawId::new("BOE-A-2018-16673").unwrap();
        assert_eq!(id.year(), 2018);
        assert_eq!(id.to_string(), "BOE-A-2018-16673");
    }

    #[test]
    fn test_deserialize_rejects_bad_format() {
        let ok: Result<LawId, _> = serde_json::from_str("\"BOE-A-1889-4763\"");
        assert!(ok.is_ok());
        let bad: Result<LawId, _> = serde_json::from_str("\"constitucion\"");
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn prop_generated_ids_are_valid(
            letter in "[A-Z]",
            year in 1000u32..=9999,
            number in 0u32..=99999,
        ) {
            let id = format!("BOE-{}-{}-{}", letter, year, number);
            prop_assert!(LawId::is_valid(&id));
            prop_assert_eq!(LawId::new(id).unwrap().year(), year);
        }

        #[test]
        fn prop_lowercase_never_valid(s in "boe-[a-z]-[0-9]{4}-[0-9]{1,5}") {
            prop_assert!(!LawId::is_valid(&s));
        }
    }
}
