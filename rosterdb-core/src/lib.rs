//! A thin person-roster CRUD layer over document databases, providing a unified interface for working with document stores.
//!
//! This crate is the core of the rosterdb project and provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining, validating, and serializing documents
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing different storage backends
//! - **Query and filtering API** ([`query`]) - Type-safe query construction, filtering, and update patches
//! - **Collections interface** ([`collection`]) - High-level API for interacting with document collections
//! - **Document store** ([`store`]) - Main interface for working with typed documents
//! - **Error handling** ([`error`]) - Comprehensive error types and result types
//!
//! # Example
//!
//! ```ignore
//! use rosterdb::{Document, DocumentStore};
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
//!     fn id(&self) -> &Uuid {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "users"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rosterdb_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
