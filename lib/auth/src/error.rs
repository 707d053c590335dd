//! Error types for the auth crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `CredentialError`: Form validation failures, raised before any backend call
//! - `AuthenticationError`: Failures reported by the auth provider
//! - `AccountError`: High-level wrapper for context

use pingster_core::Email;
use std::fmt;

/// Errors from validating sign-in and sign-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Email or password is empty.
    MissingFields,
    /// Sign-up requires a username.
    MissingUsername,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "please fill in all fields"),
            Self::MissingUsername => write!(f, "please enter a username"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Errors from authentication operations.
///
/// These errors represent failures reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// Unknown email or wrong password.
    InvalidCredentials,
    /// An account with this email already exists.
    EmailInUse { email: Email },
    /// The password does not meet the provider's minimum length.
    WeakPassword { min_length: usize },
    /// The operation needs a signed-in user.
    NotSignedIn,
    /// The provider could not be reached or failed internally.
    ProviderError { reason: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::EmailInUse { email } => {
                write!(f, "email already in use: {email}")
            }
            Self::WeakPassword { min_length } => {
                write!(f, "password should be at least {min_length} characters")
            }
            Self::NotSignedIn => write!(f, "no user is signed in"),
            Self::ProviderError { reason } => {
                write!(f, "auth provider error: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// High-level account errors.
///
/// Use these to add context when wrapping lower-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Registration context (use as context wrapper).
    Registration { email: Email },
    /// Sign-in context (use as context wrapper).
    Login { email: Email },
    /// Sign-out context (use as context wrapper).
    Logout,
    /// Credentials were rejected before reaching the provider.
    InvalidInput(CredentialError),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registration { email } => write!(f, "registration failed for {email}"),
            Self::Login { email } => write!(f, "sign-in failed for {email}"),
            Self::Logout => write!(f, "sign-out failed"),
            Self::InvalidInput(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for AccountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_error_display() {
        assert!(CredentialError::MissingFields.to_string().contains("all fields"));
        assert!(CredentialError::MissingUsername.to_string().contains("username"));
    }

    #[test]
    fn authentication_error_email_in_use_display() {
        let err = AuthenticationError::EmailInUse {
            email: Email::new("a@x.com"),
        };
        assert!(err.to_string().contains("already in use"));
        assert!(err.to_string().contains("a@x.com"));
    }

    #[test]
    fn authentication_error_weak_password_display() {
        let err = AuthenticationError::WeakPassword { min_length: 6 };
        assert!(err.to_string().contains('6'));
    }

    #[test]
    fn account_error_wraps_credential_error() {
        let err = AccountError::InvalidInput(CredentialError::MissingUsername);
        assert_eq!(err.to_string(), "please enter a username");
    }
}
