//! Main document store interface for interacting with document backends.
//!
//! This module provides the primary API for working with document stores. A
//! [`DocumentStore`] is constructed explicitly around a backend, handed out to
//! the code that needs it, and shut down explicitly when work is done. There is
//! no global or implicit connection state.
//!
//! # Example
//!
//! ```ignore
//! use rosterdb::store::DocumentStore;
//! use rosterdb::document::Document;
//!
//! let store = DocumentStore::new(backend);
//! let collection = store.collection::<MyDocument>();
//! // ... use the collection ...
//! store.shutdown().await?;
//! ```

use crate::{
    backend::StoreBackend, collection::TypedCollection, document::Document, error::StoreResult,
};

/// A strongly-typed document store bound to a specific backend implementation.
///
/// This struct provides access to a document store with compile-time knowledge of the backend type.
/// It enables type-safe operations and full backend optimization.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
///
/// # Example
///
/// ```ignore
/// let store = DocumentStore::new(my_backend);
/// let users = store.collection::<User>();
/// ```
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// This consumes the store and should be called when no longer needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown operation fails.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}
