//! Main rosterdb crate providing typed CRUD over a person roster.
//!
//! This crate is the primary entry point for users of the rosterdb framework.
//! It re-exports the core types and functionality from various sub-crates,
//! defines the [`Person`](person::Person) entity model, and provides the
//! [`PeopleOps`](ops::PeopleOps) operation library the demo binary drives.
//!
//! # Features
//!
//! - **Type-safe person records** - The entity model is the single gateway to
//!   storage; nothing is persisted without passing its shape rules
//! - **Multiple backends** - Support for in-memory and MongoDB storage with
//!   extensible trait system
//! - **Flexible querying** - Powerful, composable query API for filtering,
//!   sorting, limiting, and projecting results
//! - **Explicit lifecycle** - Stores are constructed, passed around, and shut
//!   down explicitly; there is no ambient connection state
//!
//! # Quick Start
//!
//! ```ignore
//! use rosterdb::{memory::InMemoryStore, ops::PeopleOps, person::NewPerson, store::DocumentStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create an in-memory store backend
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!
//!     // The operation library borrows the store for its lifetime
//!     let people = PeopleOps::new(&store);
//!
//!     // Insert a person; id and timestamps are assigned on creation
//!     let alice = people
//!         .create(NewPerson::named("Alice").age(28).favorite_foods(["sushi", "burritos"]))
//!         .await
//!         .unwrap();
//!
//!     // Query people back out by name
//!     let found = people.find_by_name("Alice").await.unwrap();
//!     println!("Found people: {found:?}");
//!
//!     // Shutdown the store
//!     store.shutdown().await.unwrap();
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod config;
pub mod ops;
pub mod person;
pub mod prelude;

pub use rosterdb_core::{collection, document, store, backend, query, error};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use rosterdb_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use rosterdb_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
