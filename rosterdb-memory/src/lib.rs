//! In-memory document storage backend for rosterdb.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is ideal for development,
//! testing, and small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Type-erased storage** - Stores documents as BSON for flexibility
//! - **Deterministic ordering** - Collections keep insertion order, so "first match"
//!   and unsorted query results are stable
//! - **Full query support** - Supports filtering, sorting, limits, and projections
//!
//! # Quick Start
//!
//! ```ignore
//! use rosterdb::{prelude::*, memory::InMemoryStore};
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
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
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await.unwrap();
//!     let store = DocumentStore::new(backend);
//!     let user_collection = store.collection::<User>();
//!
//!     let user = User {
//!         id: Uuid::new(),
//!         name: "Alice".to_string(),
//!     };
//!
//!     user_collection.insert(vec![user.clone()]).await.unwrap();
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rosterdb_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
