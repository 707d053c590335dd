//! User profile records.
//!
//! One profile per account, stored at `users/{email}` when the account is
//! registered and never modified afterwards.

use crate::identity::Identity;
use pingster_core::{Email, Uid};
use pingster_store::{CollectionPath, DocumentPath, StoreError};
use rootcause::Report;
use serde::{Deserialize, Serialize};

/// Name of the collection holding user profiles.
pub const USERS_COLLECTION: &str = "users";

/// A registered user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's email address.
    pub email: Email,
    /// Chosen display name. Older records may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Provider-assigned account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uid>,
}

impl UserProfile {
    /// Creates the profile written at registration.
    #[must_use]
    pub fn for_identity(identity: &Identity, username: impl Into<String>) -> Self {
        Self {
            email: identity.email().clone(),
            username: Some(username.into()),
            uid: Some(identity.uid().clone()),
        }
    }

    /// Returns the users collection path.
    ///
    /// # Errors
    ///
    /// Never fails for the fixed collection name; the signature follows
    /// path construction.
    pub fn collection() -> Result<CollectionPath, Report<StoreError>> {
        CollectionPath::root(USERS_COLLECTION)
    }

    /// Returns the document path for a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the email is empty or contains `/`.
    pub fn path(email: &Email) -> Result<DocumentPath, Report<StoreError>> {
        Self::collection()?.doc(email.as_str())
    }

    /// Returns the name shown in lists and chat headers.
    ///
    /// Falls back to the email when no username was chosen.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.as_str(),
        }
    }

    /// Returns the upper-cased first character of the display name.
    #[must_use]
    pub fn avatar_initial(&self) -> Option<char> {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_shape() {
        let identity = Identity::new("uid-1".parse().unwrap(), Email::new("a@x.com"));
        let profile = UserProfile::for_identity(&identity, "Alice");

        let record = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(
            record,
            json!({"email": "a@x.com", "username": "Alice", "uid": "uid-1"})
        );
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let profile: UserProfile =
            serde_json::from_value(json!({"email": "bob@x.com"})).expect("deserialize");
        assert_eq!(profile.display_name(), "bob@x.com");
        assert_eq!(profile.avatar_initial(), Some('B'));

        let empty_name = UserProfile {
            username: Some(String::new()),
            ..profile
        };
        assert_eq!(empty_name.display_name(), "bob@x.com");
    }

    #[test]
    fn avatar_uses_username() {
        let profile = UserProfile {
            email: Email::new("z@x.com"),
            username: Some("neo".to_string()),
            uid: None,
        };
        assert_eq!(profile.avatar_initial(), Some('N'));
    }

    #[test]
    fn profile_path() {
        let path = UserProfile::path(&Email::new("a@x.com")).expect("valid");
        assert_eq!(path.to_string(), "users/a@x.com");
    }
}
