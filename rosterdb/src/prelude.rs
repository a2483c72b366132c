//! Convenient re-exports of commonly used types from rosterdb.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use rosterdb::prelude::*;
//! ```
//!
//! This provides access to:
//! - Document traits and the person entity model
//! - Store backends and builders
//! - Query construction and filtering
//! - Collection interfaces
//! - Error types and the operation library

pub use rosterdb_core::{
    collection::TypedCollection,
    store::DocumentStore,
    document::{Document, DocumentExt},
    backend::{DeleteSummary, StoreBackend, StoreBackendBuilder},
    query::{Query, QueryVisitor, Expr, Sort, SortDirection, FieldOp, QueryBuilder, Filter, Projection, Update},
    error::{StoreError, StoreResult},
};

pub use crate::{
    config::Config,
    ops::PeopleOps,
    person::{NewPerson, Person, PersonSummary},
};
