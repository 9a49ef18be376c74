//! Validated primitive types shared across the Patientor workspace.
//!
//! Each type here can only be constructed through a checking constructor, so holding one is proof
//! that the value is well formed. The JSON shape of every type is a plain scalar (string or
//! number); deserialisation runs the same checks as the constructors.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Errors that can occur when creating validated primitive types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    #[error("not a valid calendar date: {0}")]
    InvalidDate(String),
    #[error("not a valid social security number: {0}")]
    InvalidSsn(String),
    #[error("not a recognised gender: {0}")]
    InvalidGender(String),
    #[error("not a valid health check rating: {0}")]
    InvalidRating(String),
}

// ============================================================================
// NonEmptyText
// ============================================================================

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// DateText
// ============================================================================

/// A calendar date (or date-time) kept in the exact textual form it was supplied in.
///
/// Accepted forms are `YYYY-MM-DD`, RFC 3339 date-times and naive `YYYY-MM-DDTHH:MM:SS`
/// date-times with optional fractional seconds. No range bound is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateText(String);

impl DateText {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if Self::calendar_date_of(trimmed).is_none() {
            return Err(TextError::InvalidDate(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The calendar date this text denotes (the date part of a date-time).
    pub fn date(&self) -> NaiveDate {
        // Construction guarantees one of the accepted forms matched.
        Self::calendar_date_of(&self.0).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn calendar_date_of(text: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
            return Some(date_time.date_naive());
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|date_time| date_time.date())
    }
}

// ============================================================================
// Ssn
// ============================================================================

static SSN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{3}-?[0-9]{2}-?[0-9]{4}$").expect("SSN pattern is a valid regex")
});

/// A social-security-style identifier: three digits, two digits and four digits, each group
/// optionally separated by a single `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ssn(String);

impl Ssn {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        if !SSN_PATTERN.is_match(input) {
            return Err(TextError::InvalidSsn(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Gender
// ============================================================================

/// Administrative gender of a patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Wire representation (`male`, `female`, `other`).
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = TextError;

    /// Parses the exact lowercase wire form; no case folding or trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(TextError::InvalidGender(s.to_owned())),
        }
    }
}

// ============================================================================
// HealthCheckRating
// ============================================================================

/// Outcome of a general health check, from healthy (0) to critical risk (3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Accepts any number whose value is exactly 0, 1, 2 or 3 (so `2.0` is accepted, `1.5` is
    /// not).
    pub fn from_number(n: f64) -> Result<Self, TextError> {
        if n.fract() != 0.0 || !(0.0..=3.0).contains(&n) {
            return Err(TextError::InvalidRating(n.to_string()));
        }
        Self::try_from(n as u8)
    }
}

impl TryFrom<u8> for HealthCheckRating {
    type Error = TextError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HealthCheckRating::Healthy),
            1 => Ok(HealthCheckRating::LowRisk),
            2 => Ok(HealthCheckRating::HighRisk),
            3 => Ok(HealthCheckRating::CriticalRisk),
            other => Err(TextError::InvalidRating(other.to_string())),
        }
    }
}

// ============================================================================
// Display / AsRef / serde
// ============================================================================

macro_rules! text_newtype_impls {
    ($ty:ident, $ctor:path) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ctor(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

text_newtype_impls!(NonEmptyText, NonEmptyText::new);
text_newtype_impls!(DateText, DateText::parse);
text_newtype_impls!(Ssn, Ssn::parse);

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for HealthCheckRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl serde::Serialize for HealthCheckRating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> serde::Deserialize<'de> for HealthCheckRating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let n = f64::deserialize(deserializer)?;
        HealthCheckRating::from_number(n).map_err(serde::de::Error::custom)
    }
}
