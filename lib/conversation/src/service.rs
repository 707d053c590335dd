//! Conversation actions against the document store.

use crate::chat_id::{ConversationId, GroupId, resolve_direct_chat_id};
use crate::error::{ConversationError, GroupError};
use crate::group::{Group, MEMBERS_FIELD, NewGroup};
use crate::message::{Draft, Message, MessageAuthor};
use crate::selection::Selection;
use chrono::Utc;
use pingster_auth::UserProfile;
use pingster_core::{Email, Subscription};
use pingster_store::{Direction, DocumentStore, Query, Snapshot, to_record};
use rootcause::prelude::{Report, ResultExt};
use tracing::{debug, info, instrument, warn};

/// Number of fresh ids tried before group creation gives up.
pub const GROUP_ID_ATTEMPTS: usize = 3;

/// Field messages are ordered by.
const CREATED_AT_FIELD: &str = "createdAt";

/// Conversation actions for the signed-in user.
///
/// The store is injected; nothing here reaches for a global handle.
#[derive(Debug, Clone)]
pub struct ChatService<S> {
    store: S,
    author: MessageAuthor,
}

impl<S: DocumentStore> ChatService<S> {
    /// Creates a service acting as the given user.
    #[must_use]
    pub fn new(store: S, me: Email) -> Self {
        Self {
            store,
            author: MessageAuthor::new(me),
        }
    }

    /// Sets the name attached to sent messages.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.author = self.author.with_name(name);
        self
    }

    /// Returns the signed-in user's email.
    #[must_use]
    pub fn me(&self) -> &Email {
        &self.author.id
    }

    /// Returns the address of the direct conversation with another user.
    #[must_use]
    pub fn open_direct(&self, other: &Email) -> ConversationId {
        resolve_direct_chat_id(self.me(), other).into()
    }

    /// Creates a group with the selected members and the current user.
    ///
    /// The record is written once with an insert-if-absent write. A taken
    /// id is replaced by a fresh one, up to [`GROUP_ID_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Invalid input is rejected before any write. Id generation and store
    /// failures are returned with group creation context.
    #[instrument(skip(self, selected), fields(members = selected.len()))]
    pub async fn create_group(
        &self,
        name: &str,
        selected: &Selection,
    ) -> Result<Group, Report<ConversationError>> {
        self.create_group_with(name, selected, GroupId::generate)
            .await
    }

    async fn create_group_with(
        &self,
        name: &str,
        selected: &Selection,
        mut next_id: impl FnMut() -> Result<GroupId, GroupError>,
    ) -> Result<Group, Report<ConversationError>> {
        let new_group =
            NewGroup::new(name, self.me(), selected).map_err(ConversationError::InvalidGroup)?;
        let context = ConversationError::CreateGroup {
            name: new_group.name().to_string(),
        };

        for attempt in 1..=GROUP_ID_ATTEMPTS {
            let id = next_id()
                .map_err(Report::<GroupError>::from)
                .context(context.clone())?;
            let group = new_group.clone().into_group(id, Utc::now());
            let path = Group::path(&group.group_id).context(context.clone())?;
            let record = to_record(&group).context(context.clone())?;

            if self
                .store
                .create(&path, record)
                .await
                .context(context.clone())?
            {
                info!(group_id = %group.group_id, "created group");
                return Ok(group);
            }
            warn!(group_id = %group.group_id, attempt, "group id already taken");
        }

        Err(Report::<GroupError>::from(GroupError::IdsExhausted {
            attempts: GROUP_ID_ATTEMPTS,
        }))
        .context(context)
    }

    /// Appends a message to a conversation.
    ///
    /// Returns the message as written so it can be echoed before the live
    /// query confirms it. Nothing is queued or retried.
    ///
    /// # Errors
    ///
    /// An empty draft is rejected before any write. Store failures are
    /// returned with submission context.
    #[instrument(skip(self, draft), fields(conversation = %conversation))]
    pub async fn submit(
        &self,
        conversation: &ConversationId,
        draft: Draft,
    ) -> Result<Message, Report<ConversationError>> {
        let message = draft
            .compose(self.author.clone(), Utc::now())
            .map_err(ConversationError::InvalidMessage)?;
        let context = ConversationError::Submit {
            conversation: conversation.clone(),
        };

        let collection = conversation.messages_path().context(context.clone())?;
        let record = to_record(&message).context(context.clone())?;
        let path = self
            .store
            .add(&collection, record)
            .await
            .context(context)?;

        debug!(path = %path, "message stored");
        Ok(message)
    }

    /// Watches a conversation's messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns the store's failure with subscription context.
    pub async fn subscribe_thread(
        &self,
        conversation: &ConversationId,
    ) -> Result<Subscription<Snapshot>, Report<ConversationError>> {
        let context = ConversationError::Subscribe {
            target: conversation.to_string(),
        };
        let collection = conversation.messages_path().context(context.clone())?;
        let query = Query::collection(collection).order_by(CREATED_AT_FIELD, Direction::Descending);
        self.store.subscribe(query).await.context(context)
    }

    /// Watches every user profile.
    ///
    /// # Errors
    ///
    /// Returns the store's failure with subscription context.
    pub async fn subscribe_users(&self) -> Result<Subscription<Snapshot>, Report<ConversationError>> {
        let context = ConversationError::Subscribe {
            target: "users".to_string(),
        };
        let collection = UserProfile::collection().context(context.clone())?;
        self.store
            .subscribe(Query::collection(collection))
            .await
            .context(context)
    }

    /// Watches the groups the signed-in user belongs to.
    ///
    /// # Errors
    ///
    /// Returns the store's failure with subscription context.
    pub async fn subscribe_groups(
        &self,
    ) -> Result<Subscription<Snapshot>, Report<ConversationError>> {
        let context = ConversationError::Subscribe {
            target: "groups".to_string(),
        };
        let collection = Group::collection().context(context.clone())?;
        let query = Query::collection(collection).array_contains(MEMBERS_FIELD, self.me().canonical());
        self.store.subscribe(query).await.context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;
    use crate::thread::MessageThread;
    use futures::StreamExt;
    use pingster_store::MemoryStore;
    use serde_json::json;

    fn service(store: &MemoryStore, me: &str) -> ChatService<MemoryStore> {
        ChatService::new(store.clone(), Email::new(me))
    }

    fn selection(emails: &[&str]) -> Selection {
        emails.iter().map(|e| Email::new(*e)).collect()
    }

    fn all_groups(store: &MemoryStore) -> Snapshot {
        store.query(&Query::collection(Group::collection().unwrap()))
    }

    #[tokio::test]
    async fn create_group_writes_one_record() {
        let store = MemoryStore::new();
        let chat = service(&store, "c@x.com");

        let group = chat
            .create_group("squad", &selection(&["a@x.com"]))
            .await
            .unwrap();

        let record = store.get(&Group::path(&group.group_id).unwrap()).unwrap();
        assert_eq!(record["members"], json!(["a@x.com", "c@x.com"]));
        assert_eq!(record["createdBy"], json!("c@x.com"));
        assert_eq!(record["groupId"], json!(group.group_id.as_str()));
        assert_eq!(all_groups(&store).len(), 1);
    }

    #[tokio::test]
    async fn invalid_groups_perform_no_write() {
        let store = MemoryStore::new();
        let chat = service(&store, "c@x.com");

        assert!(chat.create_group("", &selection(&["a@x.com"])).await.is_err());
        assert!(chat.create_group("name", &Selection::default()).await.is_err());
        assert!(chat.create_group("name", &selection(&["C@x.com"])).await.is_err());

        assert!(all_groups(&store).is_empty());
    }

    #[tokio::test]
    async fn taken_group_id_is_replaced() {
        let store = MemoryStore::new();
        let taken: GroupId = "GROUP_taken".parse().unwrap();
        store
            .set(&Group::path(&taken).unwrap(), json!({"name": "existing"}))
            .await
            .unwrap();
        let chat = service(&store, "c@x.com");

        let mut ids = vec!["GROUP_fresh", "GROUP_taken"];
        let group = chat
            .create_group_with("squad", &selection(&["a@x.com"]), || {
                Ok(ids.pop().unwrap().parse().unwrap())
            })
            .await
            .unwrap();

        assert_eq!(group.group_id.as_str(), "GROUP_fresh");
        assert_eq!(
            store.get(&Group::path(&taken).unwrap()),
            Some(json!({"name": "existing"}))
        );
        assert_eq!(all_groups(&store).len(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_repeated_collisions() {
        let store = MemoryStore::new();
        let taken: GroupId = "GROUP_taken".parse().unwrap();
        store
            .set(&Group::path(&taken).unwrap(), json!({"name": "existing"}))
            .await
            .unwrap();
        let chat = service(&store, "c@x.com");

        let mut calls = 0;
        let report = chat
            .create_group_with("squad", &selection(&["a@x.com"]), || {
                calls += 1;
                Ok(taken.clone())
            })
            .await
            .unwrap_err();

        assert_eq!(calls, GROUP_ID_ATTEMPTS);
        assert!(report.to_string().contains("squad"));
        assert_eq!(all_groups(&store).len(), 1);
    }

    #[tokio::test]
    async fn submit_appends_to_conversation() {
        let store = MemoryStore::new();
        let chat = service(&store, "a@x.com").with_display_name("Ann");
        let conversation = chat.open_direct(&Email::new("B@x.com"));

        let message = chat
            .submit(&conversation, Draft::text("hi"))
            .await
            .unwrap();

        let stored = store.query(&Query::collection(conversation.messages_path().unwrap()));
        assert_eq!(stored.len(), 1);
        let record = &stored.documents[0].data;
        assert_eq!(record["_id"], json!(message.id.as_str()));
        assert_eq!(record["text"], json!("hi"));
        assert_eq!(record["image"], json!(null));
        assert_eq!(record["user"], json!({"_id": "a@x.com", "name": "Ann"}));
    }

    #[tokio::test]
    async fn empty_draft_performs_no_write() {
        let store = MemoryStore::new();
        let chat = service(&store, "a@x.com");
        let conversation = chat.open_direct(&Email::new("b@x.com"));

        assert!(chat.submit(&conversation, Draft::default()).await.is_err());
        assert!(store
            .query(&Query::collection(conversation.messages_path().unwrap()))
            .is_empty());
    }

    #[tokio::test]
    async fn both_sides_share_a_direct_thread() {
        let store = MemoryStore::new();
        let alice = service(&store, "alice@x.com");
        let bob = service(&store, "Bob@X.com");

        let conversation = alice.open_direct(&Email::new("bob@x.com"));
        assert_eq!(conversation, bob.open_direct(&Email::new("Alice@x.com")));

        let mut updates = bob.subscribe_thread(&conversation).await.unwrap();
        assert!(updates.next().await.unwrap().is_empty());

        let sent = alice
            .submit(&conversation, Draft::text("hello bob"))
            .await
            .unwrap();

        let mut thread = MessageThread::new();
        thread.apply_snapshot(&updates.next().await.unwrap());
        assert_eq!(thread.messages()[0].id, sent.id);
        updates.close();
    }

    #[tokio::test]
    async fn thread_stays_newest_first_after_inserts() {
        let store = MemoryStore::new();
        let chat = service(&store, "a@x.com");
        let conversation = chat.open_direct(&Email::new("b@x.com"));
        let mut updates = chat.subscribe_thread(&conversation).await.unwrap();
        let mut thread = MessageThread::new();
        thread.apply_snapshot(&updates.next().await.unwrap());

        for text in ["one", "two", "three"] {
            let sent = chat.submit(&conversation, Draft::text(text)).await.unwrap();
            thread.echo(sent);
            thread.apply_snapshot(&updates.next().await.unwrap());

            let messages = thread.messages();
            assert!(messages
                .windows(2)
                .all(|pair| (pair[0].created_at, &pair[0].id) > (pair[1].created_at, &pair[1].id)));
        }
        assert_eq!(thread.messages()[0].text, "three");
    }

    #[tokio::test]
    async fn members_see_new_groups() {
        let store = MemoryStore::new();
        let creator = service(&store, "c@x.com");
        let member = service(&store, "A@X.com");
        let outsider = service(&store, "z@x.com");

        let mut member_groups = member.subscribe_groups().await.unwrap();
        let mut outsider_groups = outsider.subscribe_groups().await.unwrap();
        let mut directory = Directory::new(member.me().clone());
        directory.apply_groups(&member_groups.next().await.unwrap());
        assert!(directory.groups().is_empty());

        let group = creator
            .create_group("squad", &selection(&["a@x.com"]))
            .await
            .unwrap();

        directory.apply_groups(&member_groups.next().await.unwrap());
        assert_eq!(directory.groups(), [group]);

        outsider_groups.next().await.unwrap();
        assert!(outsider_groups.next().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn users_subscription_lists_profiles() {
        let store = MemoryStore::new();
        let chat = service(&store, "me@x.com");
        for email in ["me@x.com", "a@x.com"] {
            let profile = UserProfile {
                email: Email::new(email),
                username: None,
                uid: None,
            };
            store
                .set(
                    &UserProfile::path(&profile.email).unwrap(),
                    to_record(&profile).unwrap(),
                )
                .await
                .unwrap();
        }

        let mut users = chat.subscribe_users().await.unwrap();
        let mut directory = Directory::new(chat.me().clone());
        directory.apply_users(&users.next().await.unwrap());

        assert_eq!(directory.users().len(), 1);
        assert_eq!(directory.users()[0].email.as_str(), "a@x.com");
    }
}
