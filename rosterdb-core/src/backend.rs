//! Storage backend abstraction for the document store.
//!
//! This module defines the core traits that abstract over different storage implementations,
//! allowing the document store to work with various backends (in-memory, persistent, distributed, etc.).
//!
//! # Overview
//!
//! The [`StoreBackend`] trait provides a unified async interface for all storage operations
//! including document insertion, retrieval, replacement, deletion, and querying.
//! Implementations are required to be thread-safe (`Send + Sync`) and support concurrent access.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use rosterdb::backend::StoreBackend;
//! use bson::{Uuid, Bson, doc};
//!
//! // Use a concrete backend implementation
//! let backend = MyBackendImpl::new();
//!
//! // Insert a document into a collection
//! let uuid = Uuid::new();
//! let doc = Bson::Document(doc! { "name": "Alice", "age": 28 });
//! backend.insert_documents(vec![(uuid, doc)], "people").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Uuid};
use std::fmt::Debug;

use crate::{
    error::StoreResult,
    query::{Expr, Query, Update},
};

/// Outcome of a bulk delete operation.
///
/// Reports how many documents were removed and whether the storage layer
/// acknowledged the write. Deleting zero documents is a success, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSummary {
    /// Number of documents removed.
    pub deleted_count: u64,
    /// Whether the storage layer acknowledged the delete.
    pub acknowledged: bool,
}

/// Abstract interface for document storage backends.
///
/// Implementers of this trait provide concrete storage strategies for documents,
/// supporting everything from simple in-memory stores to remote database servers.
/// The trait defines essential operations for document lifecycle management and
/// predicate-based queries and updates.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. Each method call is atomic with respect to other calls on the same
/// backend; the exact concurrency model (e.g., lock-free, mutex-based, read-write locks)
/// is implementation-specific but should be documented by the implementer.
///
/// # Match Order
///
/// Methods that act on "the first matching document" resolve ties in the backend's
/// natural order. Implementations must document what that order is and keep it
/// stable across calls.
///
/// # Error Handling
///
/// Operations return [`StoreResult<T>`](crate::error::StoreResult), which is a
/// specialized `Result` type. Lookups that find nothing return `Ok(None)` rather
/// than an error; only writes that require an existing target report
/// [`StoreError::NotFound`](crate::error::StoreError::NotFound).
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts new documents into a collection.
    ///
    /// This method batches the insertion of multiple documents into a single collection.
    /// Inserting a document whose ID is already present is a constraint violation and
    /// fails with [`StoreError::Storage`](crate::error::StoreError::Storage).
    ///
    /// # Arguments
    ///
    /// * `documents` - A vector of (UUID, BSON document) pairs to insert
    /// * `collection` - The name of the collection to insert into. Created automatically if it doesn't exist.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or a [`StoreError`](crate::error::StoreError) on failure.
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> StoreResult<()>;

    /// Retrieves a single document from a collection by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The document UUID to look up
    /// * `collection` - The name of the collection to query
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(document))` if the document exists, `Ok(None)` if it does not
    /// (including when the collection itself does not exist), or a
    /// [`StoreError`](crate::error::StoreError) on failure.
    async fn get_document(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>>;

    /// Queries documents in a collection using a structured query.
    ///
    /// This method applies the query parts in a fixed order: filter, then sort, then
    /// limit, then projection. An unfiltered query matches every document. Querying a
    /// collection that does not exist yields an empty result.
    ///
    /// # Arguments
    ///
    /// * `query` - The [`Query`] object specifying filter, sort, limit, and projection
    /// * `collection` - The name of the collection to query
    ///
    /// # Returns
    ///
    /// Returns a vector of matching BSON documents, or a [`StoreError`](crate::error::StoreError) on failure.
    ///
    /// # See Also
    ///
    /// - [`Query`] for constructing queries
    /// - [`crate::query::Filter`] for building filter expressions
    async fn query_documents(&self, query: Query, collection: &str) -> StoreResult<Vec<Bson>>;

    /// Replaces an existing document in a collection with new content.
    ///
    /// The document keeps its ID; everything else is overwritten. Replacing a
    /// document that does not exist fails with
    /// [`StoreError::NotFound`](crate::error::StoreError::NotFound).
    ///
    /// # Arguments
    ///
    /// * `id` - The UUID of the document to replace
    /// * `document` - The new BSON content
    /// * `collection` - The name of the collection containing the document
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or a [`StoreError`](crate::error::StoreError) on failure.
    async fn replace_document(&self, id: Uuid, document: Bson, collection: &str)
    -> StoreResult<()>;

    /// Applies an update patch to the first document matching a filter expression.
    ///
    /// Find-and-apply happens atomically: no other write can interleave between the
    /// match and the patch. The first match is resolved in the backend's natural order.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter expression selecting candidate documents
    /// * `update` - The field assignments to apply
    /// * `collection` - The name of the collection to update
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(document))` with the post-update state of the patched document,
    /// `Ok(None)` if nothing matched, or a [`StoreError`](crate::error::StoreError) on failure.
    async fn update_first_matching(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> StoreResult<Option<Bson>>;

    /// Removes a single document from a collection by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The UUID of the document to remove
    /// * `collection` - The name of the collection to remove from
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(document))` with the removed document's pre-deletion state,
    /// `Ok(None)` if no such document existed, or a [`StoreError`](crate::error::StoreError) on failure.
    async fn remove_document(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>>;

    /// Removes every document matching a filter expression.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter expression selecting documents to remove
    /// * `collection` - The name of the collection to remove from
    ///
    /// # Returns
    ///
    /// Returns a [`DeleteSummary`] reporting the number of documents removed (possibly
    /// zero), or a [`StoreError`](crate::error::StoreError) on failure.
    async fn remove_matching(&self, filter: Expr, collection: &str) -> StoreResult<DeleteSummary>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// This method is called when the backend is being dropped. Implementers should
    /// use this to close connections, flush caches, and perform other cleanup operations.
    ///
    /// The default implementation is a no-op, but backends with persistent storage or
    /// external connections should override this.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or a [`StoreError`](crate::error::StoreError) on failure.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
