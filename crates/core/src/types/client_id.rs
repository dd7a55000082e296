//! Client identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ClientId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientIdError {
    /// The input string is empty.
    #[error("client identifier cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("client identifier must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_]`.
    #[error("client identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A tenant identifier selecting which store credentials to use.
///
/// Identifiers are case-insensitive: `acme`, `Acme` and `ACME` all refer to
/// the same tenant. The stored form is lowercase; the environment variable
/// prefix is the uppercase form (see [`ClientId::env_prefix`]).
///
/// ## Constraints
///
/// - Length: 1-64 characters
/// - Characters: ASCII letters, digits and underscore
///
/// ## Examples
///
/// ```
/// use fixedscope_core::ClientId;
///
/// let id = ClientId::parse("Acme_Store").unwrap();
/// assert_eq!(id.as_str(), "acme_store");
/// assert_eq!(id.env_prefix(), "ACME_STORE");
///
/// assert!(ClientId::parse("").is_err());
/// assert!(ClientId::parse("acme-store").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Maximum length of a client identifier.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `ClientId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 64 characters, or
    /// contains anything other than ASCII letters, digits and underscores.
    pub fn parse(s: &str) -> Result<Self, ClientIdError> {
        if s.is_empty() {
            return Err(ClientIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ClientIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
            return Err(ClientIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the normalized (lowercase) identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the environment variable prefix for this client (uppercase).
    #[must_use]
    pub fn env_prefix(&self) -> String {
        self.0.to_ascii_uppercase()
    }

    /// Returns the name of the environment variable holding `suffix` for
    /// this client, e.g. `ACME_STORE_URL` for suffix `STORE_URL`.
    #[must_use]
    pub fn env_var(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.env_prefix())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for ClientId {
    type Err = ClientIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClientId {
    type Error = ClientIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let id = ClientId::parse("AcMe").unwrap();
        assert_eq!(id.as_str(), "acme");
        assert_eq!(id, ClientId::parse("ACME").unwrap());
    }

    #[test]
    fn test_env_var_names() {
        let id = ClientId::parse("big_shop2").unwrap();
        assert_eq!(id.env_prefix(), "BIG_SHOP2");
        assert_eq!(id.env_var("CLIENT_SECRET"), "BIG_SHOP2_CLIENT_SECRET");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ClientId::parse(""), Err(ClientIdError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(ClientId::MAX_LENGTH + 1);
        assert_eq!(
            ClientId::parse(&long),
            Err(ClientIdError::TooLong {
                max: ClientId::MAX_LENGTH
            })
        );
        assert!(ClientId::parse(&"a".repeat(ClientId::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        assert_eq!(
            ClientId::parse("acme-store"),
            Err(ClientIdError::InvalidCharacter('-'))
        );
        assert_eq!(
            ClientId::parse("../etc"),
            Err(ClientIdError::InvalidCharacter('.'))
        );
        assert!(ClientId::parse("café").is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let id: ClientId = serde_json::from_str("\"Acme\"").unwrap();
        assert_eq!(id.as_str(), "acme");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"acme\"");
        assert!(serde_json::from_str::<ClientId>("\"a b\"").is_err());
    }
}
