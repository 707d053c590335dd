//! In-process auth provider.
//!
//! Stands in for the hosted auth backend in tests and local runs. Accounts
//! live only as long as the provider; passwords are compared in memory and
//! never leave the process.

use crate::error::AuthenticationError;
use crate::identity::Identity;
use crate::provider::AuthProvider;
use async_trait::async_trait;
use pingster_core::subscription::{self, Publisher, Subscription};
use pingster_core::{Email, Uid};
use rootcause::Report;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    uid: Uid,
    password: String,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    current: Option<Identity>,
    listeners: Vec<Publisher<Option<Identity>>>,
}

impl Inner {
    fn set_current(&mut self, identity: Option<Identity>) {
        if self.current == identity {
            return;
        }
        self.current = identity;
        let current = self.current.clone();
        self.listeners
            .retain(|listener| listener.publish(current.clone()));
    }
}

/// An auth provider held entirely in memory.
///
/// Emails are normalized to lower case, as hosted providers do. Clones share
/// the same accounts and session.
#[derive(Clone, Default)]
pub struct MemoryAuthProvider {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryAuthProvider {
    /// Creates a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MemoryAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryAuthProvider")
            .field("accounts", &inner.accounts.len())
            .field("current", &inner.current)
            .finish()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, Report<AuthenticationError>> {
        let mut inner = self.lock();
        let identity = match inner.accounts.get(&email.canonical()) {
            Some(account) if account.password == password => {
                Identity::new(account.uid.clone(), email.to_canonical())
            }
            _ => return Err(AuthenticationError::InvalidCredentials.into()),
        };
        inner.set_current(Some(identity.clone()));
        info!(uid = %identity.uid(), "signed in");
        Ok(identity)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, Report<AuthenticationError>> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthenticationError::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            }
            .into());
        }
        let mut inner = self.lock();
        let key = email.canonical();
        if inner.accounts.contains_key(&key) {
            return Err(AuthenticationError::EmailInUse {
                email: email.clone(),
            }
            .into());
        }
        let uid = Uid::generate();
        inner.accounts.insert(
            key,
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        let identity = Identity::new(uid, email.to_canonical());
        inner.set_current(Some(identity.clone()));
        info!(uid = %identity.uid(), "account created");
        Ok(identity)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), Report<AuthenticationError>> {
        self.lock().set_current(None);
        debug!("signed out");
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    fn on_auth_state_changed(&self) -> Subscription<Option<Identity>> {
        let (publisher, subscription) = subscription::channel();
        let mut inner = self.lock();
        if publisher.publish(inner.current.clone()) {
            inner.listeners.push(publisher);
        }
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = MemoryAuthProvider::new();
        let created = auth
            .sign_up(&Email::new("Alice@X.com"), "secret1")
            .await
            .unwrap();
        assert_eq!(created.email().as_str(), "alice@x.com");

        auth.sign_out().await.unwrap();
        assert_eq!(auth.current_identity(), None);

        let signed_in = auth
            .sign_in(&Email::new("alice@x.com"), "secret1")
            .await
            .unwrap();
        assert_eq!(signed_in.uid(), created.uid());
        assert_eq!(auth.current_identity(), Some(signed_in));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = MemoryAuthProvider::new();
        auth.sign_up(&Email::new("a@x.com"), "secret1").await.unwrap();

        let report = auth
            .sign_up(&Email::new("A@x.com"), "secret2")
            .await
            .unwrap_err();
        assert!(report.to_string().contains("already in use"));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let auth = MemoryAuthProvider::new();
        let report = auth
            .sign_up(&Email::new("a@x.com"), "12345")
            .await
            .unwrap_err();
        assert!(report.to_string().contains("at least 6"));
        assert_eq!(auth.current_identity(), None);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = MemoryAuthProvider::new();
        auth.sign_up(&Email::new("a@x.com"), "secret1").await.unwrap();
        auth.sign_out().await.unwrap();

        assert!(auth.sign_in(&Email::new("a@x.com"), "nope").await.is_err());
        assert!(auth.sign_in(&Email::new("b@x.com"), "secret1").await.is_err());
        assert_eq!(auth.current_identity(), None);
    }

    #[tokio::test]
    async fn auth_state_delivers_current_then_changes() {
        let auth = MemoryAuthProvider::new();
        let mut states = auth.on_auth_state_changed();
        assert_eq!(states.next().await, Some(None));

        let identity = auth
            .sign_up(&Email::new("a@x.com"), "secret1")
            .await
            .unwrap();
        assert_eq!(states.next().await, Some(Some(identity)));

        auth.sign_out().await.unwrap();
        assert_eq!(states.next().await, Some(None));

        states.close();
        auth.sign_in(&Email::new("a@x.com"), "secret1").await.unwrap();
        assert_eq!(states.next().await, None);
    }
}
