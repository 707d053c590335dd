//! Query result sets.

use crate::error::StoreError;
use crate::path::DocumentPath;
use rootcause::Report;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::warn;

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Where the document lives.
    pub path: DocumentPath,
    /// The record, always a JSON object.
    pub data: JsonValue,
}

impl Document {
    /// Returns the document id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.path.id()
    }

    /// Decodes the record into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the record does not match the type's shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Report<StoreError>> {
        T::deserialize(&self.data).map_err(|e| {
            StoreError::Decode {
                path: self.path.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// The full result set of a query at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Matching documents, in query order.
    pub documents: Vec<Document>,
}

impl Snapshot {
    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the result set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterates over the documents in query order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Decodes every document, failing on the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns `Decode` for the first document that does not match.
    pub fn decode_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, Report<StoreError>> {
        self.documents.iter().map(Document::decode).collect()
    }

    /// Decodes every document, skipping malformed ones.
    ///
    /// Records written by other clients may not follow our shapes; one bad
    /// record must not hide the rest of a live list.
    #[must_use]
    pub fn decode_valid<T: DeserializeOwned>(&self) -> Vec<T> {
        self.documents
            .iter()
            .filter_map(|document| match document.decode() {
                Ok(value) => Some(value),
                Err(report) => {
                    warn!(path = %document.path, error = %report, "skipping malformed document");
                    None
                }
            })
            .collect()
    }
}
