//! Collection types for document store operations.
//!
//! This module provides the typed collection abstraction used to work with the
//! documents of a single collection. Every read deserializes into the document
//! type and every write validates and serializes from it, so callers never
//! handle raw BSON or bypass the document's shape rules.
//!
//! # Example
//!
//! ```ignore
//! use rosterdb::document::Document;
//! use serde::{Serialize, Deserialize};
//! use bson::Uuid;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: Uuid,
//!     pub name: String,
//! }
//!
//! impl Document for User {
//!     fn id(&self) -> &Uuid { &self.id }
//!     fn collection_name() -> &'static str { "users" }
//! }
//!
//! # async fn example(store: &rosterdb::store::DocumentStore<impl rosterdb::backend::StoreBackend>) -> rosterdb::error::StoreResult<()> {
//! // Get a typed collection
//! let users = store.collection::<User>();
//! let user = User { id: Uuid::new(), name: "Alice".to_string() };
//! users.insert(vec![user]).await?;
//! # Ok(()) }
//! ```

use bson::{Bson, Uuid, de::deserialize_from_bson};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use crate::{
    backend::{DeleteSummary, StoreBackend},
    document::{Document, DocumentExt},
    error::StoreResult,
    query::{Expr, Query, Update},
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts new documents into the collection.
    ///
    /// Every document is validated before anything is written; a validation
    /// failure rejects the whole batch.
    ///
    /// # Arguments
    ///
    /// * `documents` - A vector of documents to insert
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if validation,
    /// serialization, or insertion fails.
    pub async fn insert(&self, documents: Vec<D>) -> StoreResult<()> {
        for document in &documents {
            document.validate()?;
        }
        Ok(self
            .backend
            .insert_documents(
                documents
                    .into_iter()
                    .map(|d| {
                        d.to_bson()
                            .map(move |b| (d.id().clone(), b))
                    })
                    .collect::<Result<Vec<(Uuid, Bson)>, _>>()?,
                &self.name(),
            )
            .await?)
    }

    /// Retrieves a document from the collection by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The document ID to look up (must implement `Into<Uuid>`)
    ///
    /// # Returns
    ///
    /// The document if it exists, or `None` if no document has that ID.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if deserialization or retrieval fails.
    pub async fn get<U>(&self, id: U) -> StoreResult<Option<D>>
    where
        U: Into<Uuid> + Send + Sync + 'static,
    {
        Ok(self
            .backend
            .get_document(id.into(), &self.name())
            .await?
            .map(D::from_bson)
            .transpose()?)
    }

    /// Queries documents in the collection using a structured query.
    ///
    /// # Arguments
    ///
    /// * `query` - The [`Query`] specifying filter, sort, limit, and projection
    ///
    /// # Returns
    ///
    /// A vector of documents matching the query criteria.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if deserialization or the query fails.
    pub async fn query(&self, query: Query) -> StoreResult<Vec<D>> {
        Ok(self
            .backend
            .query_documents(query, &self.name())
            .await?
            .into_iter()
            .map(|doc| D::from_bson(doc))
            .collect::<Result<Vec<D>, _>>()?)
    }

    /// Queries the collection and returns the first matching document, if any.
    ///
    /// The query's limit is forced to one, so backends stop at the first match
    /// in their natural order.
    ///
    /// # Arguments
    ///
    /// * `query` - The [`Query`] specifying filter and sort
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if deserialization or the query fails.
    pub async fn query_first(&self, mut query: Query) -> StoreResult<Option<D>> {
        query.limit = Some(1);
        Ok(self
            .backend
            .query_documents(query, &self.name())
            .await?
            .into_iter()
            .next()
            .map(D::from_bson)
            .transpose()?)
    }

    /// Queries documents and deserializes results into an alternate view type.
    ///
    /// Useful with projected queries whose results no longer carry every field
    /// of `D`, such as summary types with fields excluded.
    ///
    /// # Arguments
    ///
    /// * `query` - The [`Query`] specifying filter, sort, limit, and projection
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if deserialization or the query fails.
    pub async fn query_as<T: DeserializeOwned>(&self, query: Query) -> StoreResult<Vec<T>> {
        Ok(self
            .backend
            .query_documents(query, &self.name())
            .await?
            .into_iter()
            .map(|doc| deserialize_from_bson(doc))
            .collect::<Result<Vec<T>, _>>()?)
    }

    /// Saves modified content for a document that already exists in the collection.
    ///
    /// The document is validated, then replaces the stored content under its ID.
    ///
    /// # Arguments
    ///
    /// * `document` - The document with updated content
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::error::StoreError::NotFound) if no
    /// document with this ID exists, or another [`StoreError`](crate::error::StoreError)
    /// if validation, serialization, or the replace fails.
    pub async fn save(&self, document: &D) -> StoreResult<()> {
        document.validate()?;
        Ok(self
            .backend
            .replace_document(document.id().clone(), document.to_bson()?, &self.name())
            .await?)
    }

    /// Applies an update patch to the first document matching a filter expression.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter expression selecting candidate documents
    /// * `update` - The field assignments to apply
    ///
    /// # Returns
    ///
    /// The patched document in its post-update state, or `None` if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if deserialization or the update fails.
    pub async fn update_first(&self, filter: Expr, update: Update) -> StoreResult<Option<D>> {
        Ok(self
            .backend
            .update_first_matching(filter, update, &self.name())
            .await?
            .map(D::from_bson)
            .transpose()?)
    }

    /// Removes a document from the collection by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The document ID to remove (must implement `Into<Uuid>`)
    ///
    /// # Returns
    ///
    /// The removed document in its pre-deletion state, or `None` if no document
    /// had that ID.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if deserialization or the removal fails.
    pub async fn remove<U>(&self, id: U) -> StoreResult<Option<D>>
    where
        U: Into<Uuid> + Send + Sync + 'static,
    {
        Ok(self
            .backend
            .remove_document(id.into(), &self.name())
            .await?
            .map(D::from_bson)
            .transpose()?)
    }

    /// Removes every document matching a filter expression.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter expression selecting documents to remove
    ///
    /// # Returns
    ///
    /// A [`DeleteSummary`] reporting the number of documents removed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if the operation fails.
    pub async fn remove_matching(&self, filter: Expr) -> StoreResult<DeleteSummary> {
        Ok(self
            .backend
            .remove_matching(filter, &self.name())
            .await?)
    }
}
