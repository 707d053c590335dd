//! Conversation addressing.
//!
//! A direct conversation is addressed by a pure function of its two
//! participants, so either side derives the same id without asking the
//! backend. A group conversation is addressed by a random id minted when the
//! group is created.

use crate::error::GroupError;
use pingster_core::{Email, ParseIdError};
use pingster_store::{CollectionPath, StoreError};
use rootcause::Report;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix marking group conversation ids.
pub const GROUP_PREFIX: &str = "GROUP_";

/// Top-level collection holding every conversation's messages.
pub const CHATS_COLLECTION: &str = "chats";

/// Sub-collection of a conversation holding its messages.
pub const MESSAGES_COLLECTION: &str = "messages";

/// Number of random bytes in a group id.
const GROUP_ID_BYTES: usize = 16;

/// Identifier of a direct (two-party) conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the id of the direct conversation between two users.
///
/// Both addresses are lower-cased, sorted, and joined with `_`, so the
/// result does not depend on who opens the conversation. Addresses are
/// treated as opaque strings.
#[must_use]
pub fn resolve_direct_chat_id(me: &Email, other: &Email) -> ChatId {
    let mut pair = [me.canonical(), other.canonical()];
    pair.sort();
    ChatId(pair.join("_"))
}

/// Identifier of a group conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

impl GroupId {
    /// Mints a fresh id from 128 bits of OS randomness.
    ///
    /// # Errors
    ///
    /// Returns `IdGeneration` if the OS random source fails.
    pub fn generate() -> Result<Self, GroupError> {
        let mut bytes = [0u8; GROUP_ID_BYTES];
        getrandom::fill(&mut bytes).map_err(|e| GroupError::IdGeneration {
            reason: e.to_string(),
        })?;
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Ok(Self(format!("{GROUP_PREFIX}{hex}")))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GroupId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(GROUP_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(Self(s.to_string())),
            _ => Err(ParseIdError {
                id_type: "GroupId",
                reason: format!("expected '{GROUP_PREFIX}' followed by a token"),
            }),
        }
    }
}

impl TryFrom<String> for GroupId {
    type Error = ParseIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GroupId> for String {
    fn from(id: GroupId) -> Self {
        id.0
    }
}

/// Address of any conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationId {
    /// Two-party conversation.
    Direct(ChatId),
    /// Group conversation.
    Group(GroupId),
}

impl ConversationId {
    /// Returns the id used as the conversation's path segment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct(id) => id.as_str(),
            Self::Group(id) => id.as_str(),
        }
    }

    /// Returns true for group conversations.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Returns the path of this conversation's message collection,
    /// `chats/{id}/messages`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the id contains `/`.
    pub fn messages_path(&self) -> Result<CollectionPath, Report<StoreError>> {
        CollectionPath::root(CHATS_COLLECTION)?
            .doc(self.as_str())?
            .collection(MESSAGES_COLLECTION)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(GROUP_PREFIX) {
            return s.parse().map(Self::Group);
        }
        if s.is_empty() {
            return Err(ParseIdError {
                id_type: "ConversationId",
                reason: "identifier is empty".to_string(),
            });
        }
        Ok(Self::Direct(ChatId(s.to_string())))
    }
}

impl From<ChatId> for ConversationId {
    fn from(id: ChatId) -> Self {
        Self::Direct(id)
    }
}

impl From<GroupId> for ConversationId {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}
