//! Message types for conversations.
//!
//! Messages are appended to `chats/{conversationId}/messages` and never
//! edited or deleted. The stored shape is
//! `{_id, createdAt, text, user: {_id, name?}, image}`.

use crate::error::MessageError;
use crate::image::ImageAttachment;
use chrono::{DateTime, Utc};
use pingster_core::{Email, MessageId};
use pingster_store::{Document, StoreError};
use rootcause::Report;
use serde::{Deserialize, Serialize};

/// The sender of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    /// The sender's email.
    #[serde(rename = "_id")]
    pub id: Email,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MessageAuthor {
    /// Creates an author without a display name.
    #[must_use]
    pub fn new(id: Email) -> Self {
        Self { id, name: None }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Unique message identifier.
    #[serde(rename = "_id")]
    pub id: MessageId,
    /// When the message was composed.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Message text; empty for image-only messages.
    pub text: String,
    /// Who sent it.
    pub user: MessageAuthor,
    /// Image data URI; serialized as `null` when absent.
    pub image: Option<String>,
}

/// The stored record as read back, tolerant of missing fields.
#[derive(Deserialize)]
struct StoredMessage {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    text: Option<String>,
    user: MessageAuthor,
    #[serde(default)]
    image: Option<String>,
}

impl Message {
    /// Reads a message from a stored document.
    ///
    /// Missing text reads as empty, and a missing, `null` or empty image
    /// reads as `None`. Records with a missing or empty `_id` take the
    /// document id.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the record lacks a timestamp or author.
    pub fn from_document(document: &Document) -> Result<Self, Report<StoreError>> {
        let stored: StoredMessage = document.decode()?;
        let id = stored
            .id
            .filter(|id| !id.is_empty())
            .as_deref()
            .unwrap_or(document.id())
            .parse::<MessageId>()
            .map_err(|e| StoreError::Decode {
                path: document.path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            id,
            created_at: stored.created_at,
            text: stored.text.unwrap_or_default(),
            user: stored.user,
            image: stored.image.filter(|uri| !uri.is_empty()),
        })
    }

    /// Returns true if the message carries an image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// A message being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Typed text.
    pub text: Option<String>,
    /// Attached image.
    pub image: Option<ImageAttachment>,
}

impl Draft {
    /// Creates a text draft.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }

    /// Creates an image draft.
    #[must_use]
    pub fn image(image: ImageAttachment) -> Self {
        Self {
            text: None,
            image: Some(image),
        }
    }

    /// Returns true if the draft has non-blank text or an image.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.image.is_some() || self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Turns the draft into a message with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDraft` when there is neither text nor an image.
    pub fn compose(
        self,
        author: MessageAuthor,
        created_at: DateTime<Utc>,
    ) -> Result<Message, MessageError> {
        if !self.has_content() {
            return Err(MessageError::EmptyDraft);
        }
        Ok(Message {
            id: MessageId::generate(),
            created_at,
            text: self.text.unwrap_or_default(),
            user: author,
            image: self.image.map(ImageAttachment::into_uri),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingster_store::DocumentPath;
    use serde_json::json;

    fn author() -> MessageAuthor {
        MessageAuthor::new(Email::new("a@x.com"))
    }

    fn now() -> DateTime<Utc> {
        "2024-05-01T10:00:00Z".parse().unwrap()
    }

    fn document(data: serde_json::Value) -> Document {
        Document {
            path: DocumentPath::parse("chats/c1/messages/doc1").unwrap(),
            data,
        }
    }

    #[test]
    fn text_message_record_has_explicit_null_image() {
        let message = Draft::text("hi").compose(author(), now()).unwrap();
        let record = serde_json::to_value(&message).unwrap();

        assert_eq!(
            record,
            json!({
                "_id": message.id.as_str(),
                "createdAt": "2024-05-01T10:00:00Z",
                "text": "hi",
                "user": {"_id": "a@x.com"},
                "image": null,
            })
        );
    }

    #[test]
    fn image_message_has_empty_text() {
        let image = ImageAttachment::from_jpeg(&[0xFF, 0xD8], 1024).unwrap();
        let message = Draft::image(image.clone())
            .compose(author().with_name("Alice"), now())
            .unwrap();

        assert_eq!(message.text, "");
        assert_eq!(message.image.as_deref(), Some(image.as_str()));
        let record = serde_json::to_value(&message).unwrap();
        assert_eq!(record["user"], json!({"_id": "a@x.com", "name": "Alice"}));
    }

    #[test]
    fn empty_drafts_are_rejected() {
        assert_eq!(
            Draft::default().compose(author(), now()),
            Err(MessageError::EmptyDraft)
        );
        assert_eq!(
            Draft::text("   ").compose(author(), now()),
            Err(MessageError::EmptyDraft)
        );
    }

    #[test]
    fn null_image_reads_back_as_none() {
        let written = Draft::text("hi").compose(author(), now()).unwrap();
        let read = Message::from_document(&document(serde_json::to_value(&written).unwrap()))
            .unwrap();

        assert_eq!(read.image, None);
        assert_eq!(read, written);
    }

    #[test]
    fn empty_image_reads_back_as_none() {
        let read = Message::from_document(&document(json!({
            "createdAt": "2024-05-01T10:00:00Z",
            "user": {"_id": "b@x.com"},
            "text": "hi",
            "image": "",
        })))
        .unwrap();

        assert_eq!(read.image, None);
        assert!(!read.has_image());
    }

    #[test]
    fn empty_message_id_falls_back_to_document_id() {
        let read = Message::from_document(&document(json!({
            "_id": "",
            "createdAt": "2024-05-01T10:00:00Z",
            "user": {"_id": "b@x.com"},
            "text": "hi",
        })))
        .unwrap();

        assert_eq!(read.id.as_str(), "doc1");
    }

    #[test]
    fn missing_fields_read_with_defaults() {
        let read = Message::from_document(&document(json!({
            "createdAt": "2024-05-01T10:00:00Z",
            "user": {"_id": "b@x.com"},
        })))
        .unwrap();

        assert_eq!(read.id.as_str(), "doc1");
        assert_eq!(read.text, "");
        assert_eq!(read.image, None);
    }

    #[test]
    fn records_without_author_are_rejected() {
        assert!(Message::from_document(&document(json!({
            "createdAt": "2024-05-01T10:00:00Z",
            "text": "orphan",
        })))
        .is_err());
    }
}
