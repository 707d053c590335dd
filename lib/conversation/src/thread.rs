//! The message list of an open conversation.
//!
//! The list is rebuilt from every live snapshot. Messages the user just sent
//! are echoed locally until a snapshot containing the same id arrives.

use crate::message::Message;
use pingster_core::MessageId;
use pingster_store::Snapshot;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::warn;

/// Messages of one conversation, newest first.
#[derive(Debug, Clone, Default)]
pub struct MessageThread {
    confirmed: Vec<Message>,
    pending: Vec<Message>,
}

impl MessageThread {
    /// Creates an empty thread.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the confirmed messages with a snapshot.
    ///
    /// Echoed messages whose id appears in the snapshot are dropped; the
    /// rest stay visible. Malformed records are skipped.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.confirmed = snapshot
            .iter()
            .filter_map(|document| match Message::from_document(document) {
                Ok(message) => Some(message),
                Err(report) => {
                    warn!(path = %document.path, error = %report, "skipping malformed message");
                    None
                }
            })
            .collect();
        self.confirmed.sort_by(newest_first);

        let confirmed: HashSet<&MessageId> = self.confirmed.iter().map(|m| &m.id).collect();
        self.pending.retain(|m| !confirmed.contains(&m.id));
    }

    /// Shows a just-sent message before the backend confirms it.
    pub fn echo(&mut self, message: Message) {
        if self.confirmed.iter().any(|m| m.id == message.id) {
            return;
        }
        self.pending.retain(|m| m.id != message.id);
        self.pending.push(message);
        self.pending.sort_by(newest_first);
    }

    /// Returns true if the message is still awaiting confirmation.
    #[must_use]
    pub fn is_pending(&self, id: &MessageId) -> bool {
        self.pending.iter().any(|m| &m.id == id)
    }

    /// Returns every message, newest first.
    #[must_use]
    pub fn messages(&self) -> Vec<&Message> {
        let mut all: Vec<&Message> = self.confirmed.iter().chain(&self.pending).collect();
        all.sort_by(|a, b| newest_first(a, b));
        all
    }

    /// Returns the number of visible messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.confirmed.len() + self.pending.len()
    }

    /// Returns true if no message is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn newest_first(a: &Message, b: &Message) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}
