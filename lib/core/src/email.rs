//! Email addresses as the user identity key.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::id::ParseIdError;

/// An email address identifying a user.
///
/// The address is kept exactly as entered, but equality, ordering and
/// hashing use the lower-cased canonical form. No syntax validation is
/// performed; the address is an opaque string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Wraps an address as entered.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the address as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lower-cased form used for comparisons and storage keys.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.0.to_lowercase()
    }

    /// Returns a copy normalized to the canonical form.
    #[must_use]
    pub fn to_canonical(&self) -> Self {
        Self(self.canonical())
    }

    /// Returns true if the address is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialOrd for Email {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Email {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseIdError {
                id_type: "Email",
                reason: "address is empty".to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for Email {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Email {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_ignores_case() {
        assert_eq!(Email::new("Bob@X.com"), Email::new("bob@x.com"));
        assert!(Email::new("alice@x.com") < Email::new("Bob@x.com"));
    }

    #[test]
    fn display_keeps_entered_form() {
        let email = Email::new("Bob@X.com");
        assert_eq!(email.to_string(), "Bob@X.com");
        assert_eq!(email.canonical(), "bob@x.com");
    }

    #[test]
    fn hash_matches_equality() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Email::new("A@x.com"));
        set.insert(Email::new("a@X.COM"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn opaque_addresses_are_accepted() {
        let email: Email = "not an address".parse().expect("should parse");
        assert_eq!(email.canonical(), "not an address");
        assert!("".parse::<Email>().is_err());
    }
}
