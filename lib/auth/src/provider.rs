//! The auth provider contract.

use crate::error::AuthenticationError;
use crate::identity::Identity;
use async_trait::async_trait;
use pingster_core::{Email, Subscription};
use rootcause::Report;
use std::sync::Arc;

/// Trait for the backend's email/password authentication.
///
/// Implementations are injected into services rather than reached through a
/// shared global handle.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signs in an existing account.
    async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, Report<AuthenticationError>>;

    /// Creates an account and signs it in.
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, Report<AuthenticationError>>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), Report<AuthenticationError>>;

    /// Returns the signed-in account, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Watches session changes.
    ///
    /// The current state is delivered immediately, then every sign-in and
    /// sign-out. `None` means signed out.
    fn on_auth_state_changed(&self) -> Subscription<Option<Identity>>;
}

#[async_trait]
impl<A: AuthProvider + ?Sized> AuthProvider for Arc<A> {
    async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, Report<AuthenticationError>> {
        (**self).sign_in(email, password).await
    }

    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, Report<AuthenticationError>> {
        (**self).sign_up(email, password).await
    }

    async fn sign_out(&self) -> Result<(), Report<AuthenticationError>> {
        (**self).sign_out().await
    }

    fn current_identity(&self) -> Option<Identity> {
        (**self).current_identity()
    }

    fn on_auth_state_changed(&self) -> Subscription<Option<Identity>> {
        (**self).on_auth_state_changed()
    }
}
