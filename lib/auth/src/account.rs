//! Account registration and session actions.

use crate::credentials::{AuthMode, Credentials};
use crate::error::AccountError;
use crate::identity::Identity;
use crate::profile::UserProfile;
use crate::provider::AuthProvider;
use pingster_store::{DocumentStore, to_record};
use rootcause::prelude::{Report, ResultExt};
use tracing::{info, instrument};

/// Account actions behind the sign-in and sign-up forms.
///
/// Both backends are injected; nothing here reaches for a global handle.
#[derive(Debug, Clone)]
pub struct AccountService<A, S> {
    auth: A,
    store: S,
}

impl<A: AuthProvider, S: DocumentStore> AccountService<A, S> {
    /// Creates a service over the given backends.
    #[must_use]
    pub fn new(auth: A, store: S) -> Self {
        Self { auth, store }
    }

    /// Returns the auth provider.
    #[must_use]
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Creates an account and writes its profile to `users/{email}`.
    ///
    /// # Errors
    ///
    /// Fails without contacting the backend when fields are missing.
    /// Provider rejections and profile write failures are returned with
    /// registration context. No retry is attempted.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn register(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, Report<AccountError>> {
        credentials
            .validate(AuthMode::SignUp)
            .map_err(AccountError::InvalidInput)?;
        let context = AccountError::Registration {
            email: credentials.email.clone(),
        };

        let identity = self
            .auth
            .sign_up(&credentials.email, &credentials.password)
            .await
            .context(context.clone())?;

        let username = credentials.username.clone().unwrap_or_default();
        let profile = UserProfile::for_identity(&identity, username);
        let path = UserProfile::path(identity.email()).context(context.clone())?;
        let record = to_record(&profile).context(context.clone())?;
        self.store.set(&path, record).await.context(context)?;

        info!(uid = %identity.uid(), "registered");
        Ok(identity)
    }

    /// Signs in an existing account.
    ///
    /// # Errors
    ///
    /// Fails without contacting the backend when fields are missing;
    /// provider rejections are returned with sign-in context.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity, Report<AccountError>> {
        credentials
            .validate(AuthMode::SignIn)
            .map_err(AccountError::InvalidInput)?;
        let identity = self
            .auth
            .sign_in(&credentials.email, &credentials.password)
            .await
            .context(AccountError::Login {
                email: credentials.email.clone(),
            })?;
        Ok(identity)
    }

    /// Ends the current session.
    ///
    /// # Errors
    ///
    /// Returns the provider's failure with sign-out context.
    pub async fn logout(&self) -> Result<(), Report<AccountError>> {
        self.auth.sign_out().await.context(AccountError::Logout)
    }

    /// Returns the signed-in account, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.auth.current_identity()
    }
}
