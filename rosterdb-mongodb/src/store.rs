use async_trait::async_trait;
use bson::{Bson, Document, Uuid, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions, ReturnDocument},
};

use rosterdb_core::{
    backend::{DeleteSummary, StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    query::{Expr, Query, QueryVisitor, Update},
};

use crate::query::MongoQueryTranslator;

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn prepare_document(&self, id: &Uuid, document: &Bson) -> StoreResult<Document> {
        let mut doc = document
            .as_document()
            .cloned()
            .ok_or_else(|| StoreError::Serialization("Expected document".into()))?;

        // Server-side identity lives under _id; keep it in lockstep with the
        // document ID even for types that don't serialize the field themselves
        doc.insert("_id", *id);

        Ok(doc)
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> StoreResult<()> {
        self.get_collection(collection)
            .insert_many(
                documents
                    .iter()
                    .map(|(id, doc)| self.prepare_document(id, doc))
                    .collect::<StoreResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn get_document(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        Ok(self
            .get_collection(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .map(Bson::Document))
    }

    async fn query_documents(&self, query: Query, collection: &str) -> StoreResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(MongoQueryTranslator::sort_document(sort));
        }
        options.projection = MongoQueryTranslator::projection_document(&query.projection);

        Ok(
            self.get_collection(collection)
                .find(
                    if let Some(expr) = &query.filter {
                        MongoQueryTranslator.visit_expr(expr)?
                    } else {
                        doc! {}
                    },
                )
                .with_options(options)
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?
                .into_iter()
                .map(Bson::Document)
                .collect()
        )
    }

    async fn replace_document(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()> {
        let result = self
            .get_collection(collection)
            .replace_one(doc! { "_id": id }, self.prepare_document(&id, &document)?)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id, collection.to_string()));
        }

        Ok(())
    }

    async fn update_first_matching(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> StoreResult<Option<Bson>> {
        Ok(self
            .get_collection(collection)
            .find_one_and_update(
                MongoQueryTranslator.visit_expr(&filter)?,
                MongoQueryTranslator::update_document(&update),
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .map(Bson::Document))
    }

    async fn remove_document(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        Ok(self
            .get_collection(collection)
            .find_one_and_delete(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .map(Bson::Document))
    }

    async fn remove_matching(&self, filter: Expr, collection: &str) -> StoreResult<DeleteSummary> {
        let result = self
            .get_collection(collection)
            .delete_many(MongoQueryTranslator.visit_expr(&filter)?)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(DeleteSummary {
            deleted_count: result.deleted_count,
            acknowledged: true,
        })
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Connects to the server and verifies the connection with a `ping`, so an
    /// unreachable or misconfigured endpoint fails here rather than on the
    /// first operation.
    async fn build(self) -> StoreResult<Self::Backend> {
        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?,
        )
        .map_err(|e| StoreError::Connection(e.to_string()))?;

        client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(MongoDbStore::new(client, self.database))
    }
}
