//! Document store contract for pingster.
//!
//! The backend persists JSON records in collection-scoped paths and serves
//! live queries. This crate provides:
//!
//! - **Paths**: validated [`CollectionPath`] and [`DocumentPath`]
//! - **Queries**: collection scans with an `array-contains` filter and ordering
//! - **Snapshots**: full result sets re-delivered on every change
//! - **[`DocumentStore`]**: the backend trait injected into services
//! - **[`MemoryStore`]**: an in-process backend for tests and local runs

pub mod error;
pub mod memory;
pub mod path;
pub mod query;
pub mod snapshot;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use path::{CollectionPath, DocumentPath};
pub use query::{Direction, Filter, OrderBy, Query};
pub use snapshot::{Document, Snapshot};
pub use store::{DocumentStore, to_record};
