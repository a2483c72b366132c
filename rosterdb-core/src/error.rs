//! Error types and result types for store operations.
//!
//! This module provides the error taxonomy shared by every backend and by the
//! higher-level crates. Use [`StoreResult<T>`] as the return type for fallible
//! operations.

use bson::Uuid;
use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
///
/// This enum covers configuration and connection setup, document validation,
/// serialization, and backend-specific failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The storage endpoint could not be reached or refused the connection.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The document violates entity shape rules (missing or empty required fields).
    #[error("Validation error: {0}")]
    Validation(String),
    /// A write targeted a document that does not exist.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document not found {0} in collection {1}")]
    NotFound(Uuid, String),
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Any other failure reported by the underlying storage backend, forwarded verbatim.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A specialized `Result` type for store operations.
///
/// This type alias is used throughout the crate to indicate operations that may fail
/// with a [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
