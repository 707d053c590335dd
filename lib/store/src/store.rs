//! The document store contract.

use crate::error::StoreError;
use crate::path::{CollectionPath, DocumentPath};
use crate::query::Query;
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use pingster_core::Subscription;
use rootcause::Report;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Trait for the backend's document storage.
///
/// Implementations are injected into services rather than reached through a
/// shared global handle. Every write is a single atomic operation; there is
/// no local queue, retry or acknowledgment tracking.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes a record at a path, replacing any existing document.
    async fn set(&self, path: &DocumentPath, record: JsonValue) -> Result<(), Report<StoreError>>;

    /// Writes a record at a path only if no document exists there.
    ///
    /// Returns false, without writing, when the path is already taken.
    async fn create(
        &self,
        path: &DocumentPath,
        record: JsonValue,
    ) -> Result<bool, Report<StoreError>>;

    /// Appends a record to a collection under a store-assigned id.
    async fn add(
        &self,
        collection: &CollectionPath,
        record: JsonValue,
    ) -> Result<DocumentPath, Report<StoreError>>;

    /// Starts a live query.
    ///
    /// The current result set is delivered first, then the full result set
    /// again after every change. The subscription must be closed on teardown.
    async fn subscribe(&self, query: Query) -> Result<Subscription<Snapshot>, Report<StoreError>>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn set(&self, path: &DocumentPath, record: JsonValue) -> Result<(), Report<StoreError>> {
        (**self).set(path, record).await
    }

    async fn create(
        &self,
        path: &DocumentPath,
        record: JsonValue,
    ) -> Result<bool, Report<StoreError>> {
        (**self).create(path, record).await
    }

    async fn add(
        &self,
        collection: &CollectionPath,
        record: JsonValue,
    ) -> Result<DocumentPath, Report<StoreError>> {
        (**self).add(collection, record).await
    }

    async fn subscribe(&self, query: Query) -> Result<Subscription<Snapshot>, Report<StoreError>> {
        (**self).subscribe(query).await
    }
}

/// Encodes a typed value as a storable record.
///
/// # Errors
///
/// Returns `InvalidRecord` if the value does not serialize to a JSON object.
pub fn to_record<T: Serialize>(value: &T) -> Result<JsonValue, Report<StoreError>> {
    let record = serde_json::to_value(value).map_err(|e| StoreError::InvalidRecord {
        reason: e.to_string(),
    })?;
    if !record.is_object() {
        return Err(StoreError::InvalidRecord {
            reason: "records must be JSON objects".to_string(),
        }
        .into());
    }
    Ok(record)
}
