//! Core domain types and utilities for pingster.
//!
//! This crate provides the foundational types shared by every other crate:
//!
//! - **Identity**: [`Email`] as the user identity key and opaque string ids
//! - **Errors**: the rootcause-based [`Result`] alias
//! - **Subscriptions**: cancellable handles for live, push-based updates

pub mod email;
pub mod error;
pub mod id;
pub mod subscription;

pub use email::Email;
pub use error::Result;
pub use id::{MessageId, ParseIdError, Uid};
pub use subscription::{Publisher, Subscription};
