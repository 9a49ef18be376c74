//! Internal implementation of record identifiers.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Identifier of a patient or of an entry, in canonical hyphenated lowercase form.
///
/// # Construction
/// - [`RecordId::new`] generates a fresh random identifier.
/// - [`RecordId::parse`] validates an externally supplied identifier (for example a path segment
///   of an API request).
///
/// # Display format
/// Always the 36-character hyphenated lowercase form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordId {
    /// Generates a new random (version 4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Uppercase, braced, URN and unhyphenated spellings are rejected, so that one identifier
    /// has exactly one spelling across the API.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "identifier must be a lowercase hyphenated UUID, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("{input}: {e}")))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is a lowercase hyphenated UUID.
    ///
    /// Purely syntactic: 36 bytes, hyphens at offsets 8, 13, 18 and 23, and `0-9`/`a-f`
    /// everywhere else.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for RecordId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_id() {
        let id = RecordId::new();
        let text = id.to_string();

        assert_eq!(text.len(), 36);
        assert!(RecordId::is_canonical(&text));
        assert_eq!(id.uuid().get_version_num(), 4);
    }

    #[test]
    fn test_new_ids_differ() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_parse_accepts_time_based_uuid() {
        let text = "d2773336-f723-11e9-8f0b-362b9e155667";
        let id = RecordId::parse(text).unwrap();

        assert_eq!(id.to_string(), text);
        assert_eq!(id.uuid().get_version_num(), 1);
    }

    #[test]
    fn test_parse_rejects_non_canonical_spellings() {
        for input in [
            "D2773336-F723-11E9-8F0B-362B9E155667",
            "d2773336f72311e98f0b362b9e155667",
            "{d2773336-f723-11e9-8f0b-362b9e155667}",
            "d2773336-f723-11e9-8f0b-362b9e15566",
            "not-a-uuid",
            "",
        ] {
            match RecordId::parse(input) {
                Err(UuidError::InvalidInput(msg)) => assert!(msg.contains("lowercase hyphenated")),
                Ok(_) => panic!("{input:?} should be rejected"),
            }
        }
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = RecordId::parse("d2773336-f723-11e9-8f0b-362b9e155667").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"d2773336-f723-11e9-8f0b-362b9e155667\"");

        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<RecordId>("\"nope\"").is_err());
    }
}
