//! Group conversations.
//!
//! A group is written once, as a single record at `groups/{groupId}`, and
//! never modified. There are no add-member or remove-member operations.

use crate::chat_id::{ConversationId, GroupId};
use crate::error::GroupError;
use chrono::{DateTime, Utc};
use pingster_core::Email;
use pingster_store::{CollectionPath, DocumentPath, StoreError};
use rootcause::Report;
use serde::{Deserialize, Serialize};

/// Name of the collection holding group records.
pub const GROUPS_COLLECTION: &str = "groups";

/// Field queried to find the groups a user belongs to.
pub const MEMBERS_FIELD: &str = "members";

/// A stored group record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// The group's conversation id.
    pub group_id: GroupId,
    /// Display name.
    pub name: String,
    /// Member emails in canonical form; always includes the creator.
    pub members: Vec<Email>,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// The creator's email.
    pub created_by: Email,
}

impl Group {
    /// Returns the groups collection path.
    ///
    /// # Errors
    ///
    /// Never fails for the fixed collection name; the signature follows
    /// path construction.
    pub fn collection() -> Result<CollectionPath, Report<StoreError>> {
        CollectionPath::root(GROUPS_COLLECTION)
    }

    /// Returns the document path of a group record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the id contains `/`.
    pub fn path(id: &GroupId) -> Result<DocumentPath, Report<StoreError>> {
        Self::collection()?.doc(id.as_str())
    }

    /// Returns the address of this group's conversation.
    #[must_use]
    pub fn conversation_id(&self) -> ConversationId {
        ConversationId::Group(self.group_id.clone())
    }

    /// Returns true if the email is a member.
    #[must_use]
    pub fn is_member(&self, email: &Email) -> bool {
        self.members.contains(email)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Returns the upper-cased first character of the name.
    #[must_use]
    pub fn avatar_initial(&self) -> Option<char> {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// A validated group waiting for its id.
///
/// Building one performs all input checks, so a rejected group never
/// reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    name: String,
    creator: Email,
    members: Vec<Email>,
}

impl NewGroup {
    /// Validates input and assembles the member list.
    ///
    /// Members are stored in canonical form, de-duplicated in first-seen
    /// order, with the creator appended unless already selected.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for an empty or whitespace name and `NoMembers`
    /// when nobody other than the creator is selected.
    pub fn new<'a>(
        name: &str,
        creator: &Email,
        selected: impl IntoIterator<Item = &'a Email>,
    ) -> Result<Self, GroupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }

        let mut members: Vec<Email> = Vec::new();
        for email in selected {
            if !members.contains(email) {
                members.push(email.to_canonical());
            }
        }
        if members.iter().all(|m| m == creator) {
            return Err(GroupError::NoMembers);
        }
        if !members.contains(creator) {
            members.push(creator.to_canonical());
        }

        Ok(Self {
            name: name.to_string(),
            creator: creator.to_canonical(),
            members,
        })
    }

    /// Returns the trimmed group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the assembled member list.
    #[must_use]
    pub fn members(&self) -> &[Email] {
        &self.members
    }

    /// Completes the record with its id and creation time.
    #[must_use]
    pub fn into_group(self, group_id: GroupId, created_at: DateTime<Utc>) -> Group {
        Group {
            group_id,
            name: self.name,
            members: self.members,
            created_at,
            created_by: self.creator,
        }
    }
}
