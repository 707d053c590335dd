//! Conversations for pingster.
//!
//! This crate provides:
//!
//! - **Addressing**: Deterministic direct chat ids and random group ids
//! - **Groups**: Validated, write-once group records
//! - **Messages**: Drafts, image attachments and the stored message shape
//! - **Threads**: Live, newest-first message lists with local echoes
//! - **Directory**: The home screen's users and groups
//! - **Chat Service**: Store-backed actions for the signed-in user
//!
//! # Example
//!
//! ```
//! use pingster_conversation::resolve_direct_chat_id;
//! use pingster_core::Email;
//!
//! let a = Email::new("Bob@X.com");
//! let b = Email::new("alice@x.com");
//! assert_eq!(resolve_direct_chat_id(&a, &b).as_str(), "alice@x.com_bob@x.com");
//! assert_eq!(resolve_direct_chat_id(&a, &b), resolve_direct_chat_id(&b, &a));
//! ```

pub mod chat_id;
pub mod directory;
pub mod error;
pub mod group;
pub mod image;
pub mod message;
pub mod selection;
pub mod service;
pub mod thread;

pub use chat_id::{ChatId, ConversationId, GroupId, resolve_direct_chat_id};
pub use directory::{ChatTarget, Directory};
pub use error::{ConversationError, GroupError, MessageError};
pub use group::{Group, NewGroup};
pub use image::ImageAttachment;
pub use message::{Draft, Message, MessageAuthor};
pub use selection::Selection;
pub use service::{ChatService, GROUP_ID_ATTEMPTS};
pub use thread::MessageThread;
