//! In-memory storage implementation for document stores.
//!
//! This module provides a simple but powerful in-memory backend that stores
//! documents as BSON values in insertion-ordered collections with async-safe
//! read-write locks.

use async_trait::async_trait;
use bson::{Bson, Uuid};
use mea::rwlock::RwLock;
use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use rosterdb_core::{
    backend::{DeleteSummary, StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    query::{Expr, Projection, Query, SortDirection, Update},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type CollectionVec = Vec<(Uuid, Bson)>;
type StoreMap = HashMap<String, CollectionVec>;

/// Thread-safe in-memory document storage backend.
///
/// This struct implements the [`StoreBackend`] trait to provide a fully functional
/// document store that operates entirely in memory using async-aware read-write locks.
/// Each collection keeps its documents in insertion order, which is also the order
/// used to resolve "first match" operations and the order of unsorted query results.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data. Every backend call takes the lock once, so each
/// call observes and produces a consistent state.
///
/// # Performance
///
/// Queries scan all documents in a collection (no indexing). For small to medium
/// datasets (< 100k documents), this is typically acceptable. For larger datasets,
/// consider using a persistent backend like MongoDB.
///
/// # Example
///
/// ```ignore
/// use rosterdb_memory::InMemoryStore;
/// use rosterdb::backend::StoreBackend;
/// use bson::{Uuid, Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     // Insert a document
///     let id = Uuid::new();
///     let doc = Bson::Document(doc! { "name": "Alice", "age": 28 });
///     store.insert_documents(vec![(id, doc)], "people").await?;
///
///     // Retrieve it
///     let found = store.get_document(id, "people").await?;
///     assert!(found.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> ordered (document_id, document) pairs
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    ///
    /// The returned store is ready for use and contains no collections or documents.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use rosterdb_memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::new();
    /// ```
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom options.
    ///
    /// Currently, the builder simply creates a default store, but it can be extended
    /// in future versions to support configuration options.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use rosterdb_memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::builder().build().await.unwrap();
    /// ```
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

fn apply_projection(documents: Vec<Bson>, projection: &Projection) -> Vec<Bson> {
    if projection.is_empty() {
        return documents;
    }

    documents
        .into_iter()
        .map(|mut doc| {
            if let Some(doc_map) = doc.as_document_mut() {
                for field in &projection.excluded {
                    doc_map.remove(field);
                }
            }
            doc
        })
        .collect()
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_vec = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            if collection_vec.iter().any(|(existing, _)| *existing == id) {
                return Err(StoreError::Storage(format!(
                    "duplicate document id {id} in collection {collection}"
                )));
            }

            collection_vec.push((id, doc));
        }

        Ok(())
    }

    async fn get_document(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        let store = self.store.read().await;
        let collection_vec = match store.get(collection) {
            Some(col) => col,
            None => return Ok(None),
        };

        Ok(collection_vec
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, doc)| doc.clone()))
    }

    async fn query_documents(&self, query: Query, collection: &str) -> StoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_vec = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        // Apply filter expressions if present, keeping insertion order
        let mut documents = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(
                collection_vec.iter().map(|(_, doc)| doc),
                filter,
            )?,
            None => collection_vec
                .iter()
                .map(|(_, doc)| doc.clone())
                .collect::<Vec<_>>(),
        };

        // Stable sort, so documents that compare equal stay in insertion order
        if let Some(sort) = &query.sort {
            documents.sort_by(|a, b| {
                let left = a
                    .as_document()
                    .and_then(|doc| doc.get(&sort.field))
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);
                let right = b
                    .as_document()
                    .and_then(|doc| doc.get(&sort.field))
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });
        }

        let documents = documents
            .into_iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(apply_projection(documents, &query.projection))
    }

    async fn replace_document(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_vec = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(StoreError::NotFound(id, collection.to_string())),
        };

        match collection_vec
            .iter_mut()
            .find(|(existing, _)| *existing == id)
        {
            Some(slot) => {
                slot.1 = document;
                Ok(())
            }
            None => Err(StoreError::NotFound(id, collection.to_string())),
        }
    }

    async fn update_first_matching(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> StoreResult<Option<Bson>> {
        let mut store = self.store.write().await;
        let collection_vec = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(None),
        };

        for (_, doc) in collection_vec.iter_mut() {
            if !DocumentEvaluator::matches(doc, &filter) {
                continue;
            }

            if let Some(doc_map) = doc.as_document_mut() {
                for (field, value) in &update.sets {
                    doc_map.insert(field.clone(), value.clone());
                }
            }

            return Ok(Some(doc.clone()));
        }

        Ok(None)
    }

    async fn remove_document(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        let mut store = self.store.write().await;
        let collection_vec = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(None),
        };

        match collection_vec
            .iter()
            .position(|(existing, _)| *existing == id)
        {
            Some(index) => Ok(Some(collection_vec.remove(index).1)),
            None => Ok(None),
        }
    }

    async fn remove_matching(&self, filter: Expr, collection: &str) -> StoreResult<DeleteSummary> {
        let mut store = self.store.write().await;
        let collection_vec = match store.get_mut(collection) {
            Some(col) => col,
            None => {
                return Ok(DeleteSummary { deleted_count: 0, acknowledged: true });
            }
        };

        let before = collection_vec.len();
        collection_vec.retain(|(_, doc)| !DocumentEvaluator::matches(doc, &filter));
        let deleted_count = (before - collection_vec.len()) as u64;

        Ok(DeleteSummary { deleted_count, acknowledged: true })
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// Currently a no-op builder, but can be extended in future versions
/// to support configuration options like capacity hints or concurrency settings.
///
/// # Example
///
/// ```ignore
/// use rosterdb_memory::InMemoryStore;
/// use rosterdb::backend::StoreBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::builder().build().await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use rosterdb_core::query::{Filter, Update};

    fn person(name: &str, age: i64, foods: &[&str]) -> Bson {
        Bson::Document(doc! {
            "name": name,
            "age": age,
            "favoriteFoods": foods.iter().map(|f| Bson::String(f.to_string())).collect::<Vec<_>>(),
        })
    }

    async fn seeded_store() -> (InMemoryStore, Vec<Uuid>) {
        let store = InMemoryStore::new();
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new()).collect();
        let documents = vec![
            (ids[0], person("John", 25, &["pizza", "burritos"])),
            (ids[1], person("Mary", 31, &["salad"])),
            (ids[2], person("John", 40, &["burritos", "steak"])),
        ];

        store
            .insert_documents(documents, "people")
            .await
            .unwrap();

        (store, ids)
    }

    #[tokio::test]
    async fn insert_then_get_returns_document() {
        let (store, ids) = seeded_store().await;

        let found = store.get_document(ids[1], "people").await.unwrap();
        let doc = found.unwrap();
        assert_eq!(doc.as_document().unwrap().get_str("name").unwrap(), "Mary");
    }

    #[tokio::test]
    async fn get_missing_document_returns_none() {
        let (store, _) = seeded_store().await;

        let found = store.get_document(Uuid::new(), "people").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn get_from_unknown_collection_returns_none() {
        let store = InMemoryStore::new();

        let found = store.get_document(Uuid::new(), "nowhere").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_id_is_a_storage_error() {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        store
            .insert_documents(vec![(id, person("John", 25, &[]))], "people")
            .await
            .unwrap();
        let err = store
            .insert_documents(vec![(id, person("John", 25, &[]))], "people")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Storage(_)));
    }

    #[tokio::test]
    async fn unfiltered_query_preserves_insertion_order() {
        let (store, _) = seeded_store().await;

        let documents = store
            .query_documents(Query::new(), "people")
            .await
            .unwrap();
        let names: Vec<&str> = documents
            .iter()
            .map(|doc| doc.as_document().unwrap().get_str("name").unwrap())
            .collect();

        assert_eq!(names, vec!["John", "Mary", "John"]);
    }

    #[tokio::test]
    async fn query_on_unknown_collection_is_empty() {
        let store = InMemoryStore::new();

        let documents = store
            .query_documents(Query::new(), "nowhere")
            .await
            .unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn filtered_query_keeps_first_match_first() {
        let (store, _) = seeded_store().await;

        let query = Query::builder()
            .filter(Filter::eq("name", "John"))
            .build();
        let documents = store.query_documents(query, "people").await.unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(
            documents[0].as_document().unwrap().get_i64("age").unwrap(),
            25
        );
    }

    #[tokio::test]
    async fn sort_and_limit_apply_before_projection() {
        let (store, _) = seeded_store().await;

        let query = Query::builder()
            .filter(Filter::contains("favoriteFoods", "burritos"))
            .sort("name", SortDirection::Asc)
            .limit(2)
            .exclude(["age"])
            .build();
        let documents = store.query_documents(query, "people").await.unwrap();

        assert_eq!(documents.len(), 2);
        for doc in &documents {
            let doc_map = doc.as_document().unwrap();
            assert!(doc_map.get("age").is_none());
            assert!(doc_map.get("name").is_some());
        }
    }

    #[tokio::test]
    async fn sort_is_stable_for_equal_keys() {
        let (store, _) = seeded_store().await;

        let query = Query::builder()
            .sort("name", SortDirection::Asc)
            .build();
        let documents = store.query_documents(query, "people").await.unwrap();
        let ages: Vec<i64> = documents
            .iter()
            .map(|doc| doc.as_document().unwrap().get_i64("age").unwrap())
            .collect();

        // The two Johns keep their insertion order
        assert_eq!(ages, vec![25, 40, 31]);
    }

    #[tokio::test]
    async fn replace_overwrites_existing_document() {
        let (store, ids) = seeded_store().await;

        store
            .replace_document(ids[1], person("Mary", 32, &["salad", "soup"]), "people")
            .await
            .unwrap();

        let doc = store
            .get_document(ids[1], "people")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.as_document().unwrap().get_i64("age").unwrap(), 32);
    }

    #[tokio::test]
    async fn replace_missing_document_is_not_found() {
        let (store, _) = seeded_store().await;

        let err = store
            .replace_document(Uuid::new(), person("Nobody", 1, &[]), "people")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_, _)));
    }

    #[tokio::test]
    async fn update_first_matching_patches_only_first() {
        let (store, ids) = seeded_store().await;

        let updated = store
            .update_first_matching(
                Filter::eq("name", "John"),
                Update::new().set("age", 20_i64),
                "people",
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            updated.as_document().unwrap().get_i64("age").unwrap(),
            20
        );

        // The second John is untouched
        let other = store
            .get_document(ids[2], "people")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(other.as_document().unwrap().get_i64("age").unwrap(), 40);
    }

    #[tokio::test]
    async fn update_first_matching_without_match_returns_none() {
        let (store, _) = seeded_store().await;

        let updated = store
            .update_first_matching(
                Filter::eq("name", "Nobody"),
                Update::new().set("age", 99_i64),
                "people",
            )
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn remove_returns_pre_deletion_snapshot() {
        let (store, ids) = seeded_store().await;

        let removed = store
            .remove_document(ids[0], "people")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            removed.as_document().unwrap().get_i64("age").unwrap(),
            25
        );

        let again = store.remove_document(ids[0], "people").await.unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn remove_matching_reports_deleted_count() {
        let (store, _) = seeded_store().await;

        let summary = store
            .remove_matching(Filter::eq("name", "John"), "people")
            .await
            .unwrap();
        assert_eq!(summary.deleted_count, 2);
        assert!(summary.acknowledged);

        let remaining = store
            .query_documents(Query::new(), "people")
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn remove_matching_nothing_is_zero_not_error() {
        let (store, _) = seeded_store().await;

        let summary = store
            .remove_matching(Filter::eq("name", "Nobody"), "people")
            .await
            .unwrap();
        assert_eq!(summary.deleted_count, 0);
        assert!(summary.acknowledged);
    }

    #[tokio::test]
    async fn remove_matching_on_unknown_collection_is_zero() {
        let store = InMemoryStore::new();

        let summary = store
            .remove_matching(Filter::eq("name", "John"), "nowhere")
            .await
            .unwrap();
        assert_eq!(summary.deleted_count, 0);
    }

    #[tokio::test]
    async fn clones_share_the_same_data() {
        let (store, ids) = seeded_store().await;
        let clone = store.clone();

        clone.remove_document(ids[1], "people").await.unwrap();

        let found = store.get_document(ids[1], "people").await.unwrap();
        assert!(found.is_none());
    }
}
