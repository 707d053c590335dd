//! Error types for the conversation crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `GroupError`: Group creation input and id generation
//! - `MessageError`: Drafts and image attachments
//! - `ConversationError`: High-level wrapper for context

use crate::chat_id::ConversationId;
use std::fmt;

/// Errors from group creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// The group name is empty or whitespace.
    EmptyName,
    /// No member other than the creator was selected.
    NoMembers,
    /// The OS random source failed.
    IdGeneration { reason: String },
    /// Every generated id was already taken.
    IdsExhausted { attempts: usize },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "enter a group name"),
            Self::NoMembers => write!(f, "select at least 1 user"),
            Self::IdGeneration { reason } => {
                write!(f, "failed to generate group id: {reason}")
            }
            Self::IdsExhausted { attempts } => {
                write!(f, "no free group id after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for GroupError {}

/// Errors from composing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// The draft has neither text nor an image.
    EmptyDraft,
    /// Image data is missing or malformed.
    InvalidImage { reason: String },
    /// Image data exceeds the configured limit.
    ImageTooLarge { size: usize, max: usize },
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDraft => write!(f, "message has no text or image"),
            Self::InvalidImage { reason } => write!(f, "invalid image: {reason}"),
            Self::ImageTooLarge { size, max } => {
                write!(f, "image is {size} bytes, limit is {max}")
            }
        }
    }
}

impl std::error::Error for MessageError {}

/// High-level conversation errors.
///
/// Use these to add context when wrapping lower-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// Group creation context (use as context wrapper).
    CreateGroup { name: String },
    /// Message submission context (use as context wrapper).
    Submit { conversation: ConversationId },
    /// Live query context (use as context wrapper).
    Subscribe { target: String },
    /// Group input was rejected before any write.
    InvalidGroup(GroupError),
    /// Message input was rejected before any write.
    InvalidMessage(MessageError),
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateGroup { name } => write!(f, "failed to create group '{name}'"),
            Self::Submit { conversation } => {
                write!(f, "failed to send message to {conversation}")
            }
            Self::Subscribe { target } => write!(f, "failed to subscribe to {target}"),
            Self::InvalidGroup(reason) => write!(f, "{reason}"),
            Self::InvalidMessage(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for ConversationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_error_display() {
        assert!(GroupError::EmptyName.to_string().contains("name"));
        assert!(GroupError::NoMembers.to_string().contains("at least 1"));
    }

    #[test]
    fn message_error_display() {
        let err = MessageError::ImageTooLarge {
            size: 2048,
            max: 1024,
        };
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn conversation_error_names_target() {
        let err = ConversationError::Submit {
            conversation: "a@x.com_b@x.com".parse().expect("valid id"),
        };
        assert!(err.to_string().contains("a@x.com_b@x.com"));
    }
}
