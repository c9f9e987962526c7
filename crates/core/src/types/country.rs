//! ISO 3166-1 alpha-2 country codes.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input string is empty.
    #[error("country code cannot be empty")]
    Empty,
    /// The input is not exactly two characters.
    #[error("country code must be exactly 2 letters (got {0})")]
    InvalidLength(usize),
    /// The input contains something other than ASCII letters.
    #[error("country code must contain only ASCII letters")]
    InvalidCharacter,
}

/// A two-letter country code, normalized to lowercase.
///
/// The commerce backend stores `iso_2` codes in lowercase and URLs carry them
/// as the first path segment (`/us/store`), so lowercase is the canonical form.
///
/// ## Examples
///
/// ```
/// use harbor_core::CountryCode;
///
/// let code = CountryCode::parse("DK").unwrap();
/// assert_eq!(code.as_str(), "dk");
///
/// assert!(CountryCode::parse("").is_err());
/// assert!(CountryCode::parse("usa").is_err());
/// assert!(CountryCode::parse("u1").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a `CountryCode` from a string, trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not two characters long, or
    /// contains anything other than ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CountryCodeError::Empty);
        }

        let len = trimmed.chars().count();
        if len != 2 {
            return Err(CountryCodeError::InvalidLength(len));
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::InvalidCharacter);
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the country code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CountryCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        assert_eq!(CountryCode::parse("US").unwrap().as_str(), "us");
        assert_eq!(CountryCode::parse("dE").unwrap().as_str(), "de");
        assert_eq!(CountryCode::parse(" gb ").unwrap().as_str(), "gb");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(CountryCode::parse(""), Err(CountryCodeError::Empty));
        assert_eq!(CountryCode::parse("   "), Err(CountryCodeError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            CountryCode::parse("usa"),
            Err(CountryCodeError::InvalidLength(3))
        );
        assert_eq!(
            CountryCode::parse("u"),
            Err(CountryCodeError::InvalidLength(1))
        );
    }

    #[test]
    fn test_parse_non_letters() {
        assert_eq!(
            CountryCode::parse("u1"),
            Err(CountryCodeError::InvalidCharacter)
        );
        assert_eq!(
            CountryCode::parse("ü1"),
            Err(CountryCodeError::InvalidCharacter)
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let code: CountryCode = serde_json::from_str("\"FR\"").unwrap();
        assert_eq!(code.as_str(), "fr");

        assert!(serde_json::from_str::<CountryCode>("\"france\"").is_err());
    }
}
