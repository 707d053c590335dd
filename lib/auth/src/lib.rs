//! Authentication and account registration for pingster.
//!
//! This crate provides:
//! - The [`AuthProvider`] contract for the backend's email/password accounts
//! - Credential validation for the sign-in and sign-up forms
//! - [`AccountService`], which registers accounts and writes user profiles
//! - [`MemoryAuthProvider`], an in-process provider for tests and local runs
//!
//! # Example
//!
//! ```
//! use pingster_auth::{AuthMode, Credentials};
//!
//! let credentials = Credentials::new("alice@example.com", "hunter22")
//!     .with_username("alice");
//! assert!(credentials.validate(AuthMode::SignUp).is_ok());
//!
//! let missing = Credentials::new("alice@example.com", "");
//! assert!(missing.validate(AuthMode::SignIn).is_err());
//! ```

pub mod account;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod memory;
pub mod profile;
pub mod provider;

// Re-export main types at crate root
pub use account::AccountService;
pub use credentials::{AuthMode, Credentials};
pub use error::{AccountError, AuthenticationError, CredentialError};
pub use identity::Identity;
pub use memory::MemoryAuthProvider;
pub use profile::UserProfile;
pub use provider::AuthProvider;
