//! The signed-in account.

use pingster_core::{Email, Uid};
use serde::{Deserialize, Serialize};

/// An authenticated account as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned account id.
    uid: Uid,
    /// The account's email address, the identity key across the app.
    email: Email,
}

impl Identity {
    /// Creates an identity.
    #[must_use]
    pub fn new(uid: Uid, email: Email) -> Self {
        Self { uid, email }
    }

    /// Returns the provider-assigned id.
    #[must_use]
    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_accessors() {
        let uid = Uid::generate();
        let identity = Identity::new(uid.clone(), Email::new("a@x.com"));

        assert_eq!(identity.uid(), &uid);
        assert_eq!(identity.email(), &Email::new("A@X.com"));
    }
}
