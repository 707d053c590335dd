//! The home screen's list of people and groups.

use crate::chat_id::{ConversationId, resolve_direct_chat_id};
use crate::group::Group;
use pingster_auth::UserProfile;
use pingster_core::Email;
use pingster_store::Snapshot;

/// A conversation ready to open, with the title shown in its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTarget {
    /// Where the conversation's messages live.
    pub conversation: ConversationId,
    /// Header title: the other user's display name, or the group name.
    pub title: String,
}

/// Other users and the signed-in user's groups, as last delivered.
#[derive(Debug, Clone)]
pub struct Directory {
    me: Email,
    users: Vec<UserProfile>,
    groups: Vec<Group>,
    groups_loaded: bool,
}

impl Directory {
    /// Creates an empty directory for the signed-in user.
    #[must_use]
    pub fn new(me: Email) -> Self {
        Self {
            me,
            users: Vec::new(),
            groups: Vec::new(),
            groups_loaded: false,
        }
    }

    /// Returns the signed-in user's email.
    #[must_use]
    pub fn me(&self) -> &Email {
        &self.me
    }

    /// Replaces the user list from a snapshot of `users`, leaving out the
    /// signed-in user.
    pub fn apply_users(&mut self, snapshot: &Snapshot) {
        self.users = snapshot
            .decode_valid::<UserProfile>()
            .into_iter()
            .filter(|profile| profile.email != self.me)
            .collect();
    }

    /// Replaces the group list from a membership snapshot.
    pub fn apply_groups(&mut self, snapshot: &Snapshot) {
        self.groups = snapshot.decode_valid();
        self.groups_loaded = true;
    }

    /// Returns true until the first group snapshot has arrived.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.groups_loaded
    }

    /// Returns the other users.
    #[must_use]
    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }

    /// Returns the groups the signed-in user belongs to.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Finds a listed user by email.
    #[must_use]
    pub fn find_user(&self, email: &Email) -> Option<&UserProfile> {
        self.users.iter().find(|profile| &profile.email == email)
    }

    /// Finds a listed group by id or, failing that, by name.
    #[must_use]
    pub fn find_group(&self, key: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|group| group.group_id.as_str() == key)
            .or_else(|| self.groups.iter().find(|group| group.name == key))
    }

    /// Opens the direct conversation with a user.
    #[must_use]
    pub fn open_user(&self, profile: &UserProfile) -> ChatTarget {
        ChatTarget {
            conversation: resolve_direct_chat_id(&self.me, &profile.email).into(),
            title: profile.display_name().to_string(),
        }
    }

    /// Opens a group conversation.
    #[must_use]
    pub fn open_group(&self, group: &Group) -> ChatTarget {
        ChatTarget {
            conversation: group.conversation_id(),
            title: group.name.clone(),
        }
    }
}
