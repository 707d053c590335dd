//! Sign-in and sign-up form input.

use crate::error::CredentialError;
use pingster_core::Email;

/// Which form the credentials were entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Existing account.
    SignIn,
    /// New account; a username is required.
    SignUp,
}

/// Credentials as entered by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: Email,
    /// Account password.
    pub password: String,
    /// Display name, only used when signing up.
    pub username: Option<String>,
}

impl Credentials {
    /// Creates credentials without a username.
    #[must_use]
    pub fn new(email: impl Into<Email>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: None,
        }
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Checks that the fields required by the form are filled in.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` when email or password is empty, and
    /// `MissingUsername` when signing up without a username.
    pub fn validate(&self, mode: AuthMode) -> Result<(), CredentialError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(CredentialError::MissingFields);
        }
        if mode == AuthMode::SignUp && self.username.as_deref().is_none_or(str::is_empty) {
            return Err(CredentialError::MissingUsername);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}
