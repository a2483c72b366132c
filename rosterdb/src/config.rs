//! Environment-driven configuration.
//!
//! The demo binary reads its MongoDB settings from the process environment,
//! with a local `.env` file honored when present. `MONGO_URI` is required;
//! `MONGO_DB` falls back to a default database name.

use rosterdb_core::error::{StoreError, StoreResult};

const DEFAULT_DATABASE: &str = "rosterdb";

/// Settings for reaching the MongoDB deployment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string, from `MONGO_URI`.
    pub mongo_uri: String,
    /// Database holding the `people` collection, from `MONGO_DB`.
    pub database: String,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first; variables
    /// already present in the environment are not overridden.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if `MONGO_URI` is not set.
    pub fn from_env() -> StoreResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        Ok(Config {
            mongo_uri: lookup("MONGO_URI")
                .ok_or_else(|| StoreError::Config("MONGO_URI is not set".to_string()))?,
            database: lookup("MONGO_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_uri_is_a_config_error() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn database_falls_back_to_default() {
        let config = Config::from_lookup(|key| match key {
            "MONGO_URI" => Some("mongodb://localhost:27017".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "rosterdb");
    }

    #[test]
    fn explicit_database_wins() {
        let config = Config::from_lookup(|key| match key {
            "MONGO_URI" => Some("mongodb://localhost:27017".to_string()),
            "MONGO_DB" => Some("roster_test".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.database, "roster_test");
    }
}
