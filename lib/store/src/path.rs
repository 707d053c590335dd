//! Collection and document paths.
//!
//! Paths alternate collection and document segments:
//! `chats/{chatId}/messages/{msgId}`. A collection path has an odd number
//! of segments, a document path an even number.

use crate::error::StoreError;
use rootcause::Report;
use std::fmt;

fn check_segment(path: &str, segment: &str) -> Result<(), Report<StoreError>> {
    if segment.is_empty() {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: "empty segment".to_string(),
        }
        .into());
    }
    if segment.contains('/') {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: format!("segment '{segment}' contains '/'"),
        }
        .into());
    }
    Ok(())
}

fn split(path: &str) -> Result<Vec<String>, Report<StoreError>> {
    let segments: Vec<String> = path.split('/').map(str::to_string).collect();
    for segment in &segments {
        check_segment(path, segment)?;
    }
    Ok(segments)
}

/// Path to a collection of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(Vec<String>);

impl CollectionPath {
    /// Creates a top-level collection path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the name is empty or contains `/`.
    pub fn root(name: &str) -> Result<Self, Report<StoreError>> {
        check_segment(name, name)?;
        Ok(Self(vec![name.to_string()]))
    }

    /// Parses a slash-separated collection path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for empty segments or an even segment count.
    pub fn parse(path: &str) -> Result<Self, Report<StoreError>> {
        let segments = split(path)?;
        if segments.len() % 2 == 0 {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "collection paths need an odd number of segments".to_string(),
            }
            .into());
        }
        Ok(Self(segments))
    }

    /// Returns the path of a document in this collection.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the id is empty or contains `/`.
    pub fn doc(&self, id: &str) -> Result<DocumentPath, Report<StoreError>> {
        check_segment(&format!("{self}/{id}"), id)?;
        let mut segments = self.0.clone();
        segments.push(id.to_string());
        Ok(DocumentPath(segments))
    }

    /// Returns the collection's own name (its last segment).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Path to a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(Vec<String>);

impl DocumentPath {
    /// Parses a slash-separated document path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for empty segments or an odd segment count.
    pub fn parse(path: &str) -> Result<Self, Report<StoreError>> {
        let segments = split(path)?;
        if segments.len() % 2 != 0 {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "document paths need an even number of segments".to_string(),
            }
            .into());
        }
        Ok(Self(segments))
    }

    /// Returns the document id (the last segment).
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Returns the collection containing this document.
    #[must_use]
    pub fn parent(&self) -> CollectionPath {
        CollectionPath(self.0[..self.0.len() - 1].to_vec())
    }

    /// Returns the path of a sub-collection nested under this document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the name is empty or contains `/`.
    pub fn collection(&self, name: &str) -> Result<CollectionPath, Report<StoreError>> {
        check_segment(&format!("{self}/{name}"), name)?;
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Ok(CollectionPath(segments))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
