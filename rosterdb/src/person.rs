//! The person entity model.
//!
//! This module defines the one domain entity stored by rosterdb: a [`Person`]
//! with a name, an age, and a list of favorite foods. The model is the single
//! source of truth for the record shape; all reads and writes go through it,
//! so raw untyped documents never reach a backend.
//!
//! New records start as a [`NewPerson`] draft. The draft carries only the
//! caller-settable fields; the identifier and both timestamps are assigned when
//! the draft is materialized:
//!
//! ```ignore
//! use rosterdb::person::NewPerson;
//!
//! let person = NewPerson::named("Alice")
//!     .age(28)
//!     .favorite_foods(["sushi", "burritos"])
//!     .into_person();
//! ```

use bson::{DateTime, Uuid};
use serde::{Deserialize, Serialize};

use rosterdb_core::{
    document::Document,
    error::{StoreError, StoreResult},
};

/// A person record as stored in the `people` collection.
///
/// The wire shape carries exactly six fields: `_id`, `name`, `age`,
/// `favoriteFoods`, `createdAt`, and `updatedAt`. The identifier is assigned
/// once on creation and never changes; `updatedAt` moves on every write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique identifier, assigned on creation.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Display name. Required and non-empty for any persisted person.
    pub name: String,
    /// Age in years. Defaults to 0 when the draft leaves it unset.
    pub age: i64,
    /// Ordered list of favorite foods. Never absent; empty is the floor.
    pub favorite_foods: Vec<String>,
    /// When the record was first inserted.
    pub created_at: DateTime,
    /// When the record was last written.
    pub updated_at: DateTime,
}

impl Person {
    /// Moves `updatedAt` to the current instant.
    ///
    /// Call this before saving a loaded record back, so the timestamp tracks
    /// the write the way atomic updates do.
    pub fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }
}

impl Document for Person {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "people"
    }

    fn validate(&self) -> StoreResult<()> {
        if self.name.is_empty() {
            return Err(StoreError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A draft for a person record that has not been persisted yet.
///
/// Fields not explicitly set take their declared defaults: `age` is 0 and
/// `favorite_foods` is empty. Materialize the draft with
/// [`into_person`](NewPerson::into_person), which assigns a fresh identifier
/// and sets both timestamps to the same instant.
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    pub name: String,
    pub age: i64,
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    /// Starts a draft with the given name and all other fields at their defaults.
    pub fn named(name: impl Into<String>) -> Self {
        NewPerson {
            name: name.into(),
            ..NewPerson::default()
        }
    }

    /// Sets the age for this draft.
    pub fn age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    /// Sets the favorite foods for this draft, replacing any previous list.
    pub fn favorite_foods(mut self, foods: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Materializes the draft into a full person record.
    ///
    /// Assigns a fresh identifier and stamps `createdAt` and `updatedAt` with
    /// the same instant.
    pub fn into_person(self) -> Person {
        let now = DateTime::now();
        Person {
            id: Uuid::new(),
            name: self.name,
            age: self.age,
            favorite_foods: self.favorite_foods,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A projected view of a person that carries no age field.
///
/// Deserialized from query results whose projection excluded `age`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub favorite_foods: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use rosterdb_core::document::DocumentExt;

    #[test]
    fn draft_defaults_apply() {
        let person = NewPerson::named("Alice").into_person();

        assert_eq!(person.name, "Alice");
        assert_eq!(person.age, 0);
        assert!(person.favorite_foods.is_empty());
        assert_eq!(person.created_at, person.updated_at);
    }

    #[test]
    fn drafts_get_distinct_ids() {
        let a = NewPerson::named("Alice").into_person();
        let b = NewPerson::named("Alice").into_person();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn wire_shape_is_exact() {
        let person = NewPerson::named("Alice")
            .age(28)
            .favorite_foods(["sushi", "burritos"])
            .into_person();

        let bson = person.to_bson().unwrap();
        let Bson::Document(doc) = bson else {
            panic!("expected a document, got {bson:?}");
        };

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["_id", "name", "age", "favoriteFoods", "createdAt", "updatedAt"]
        );
        assert_eq!(doc.get_str("name").unwrap(), "Alice");
        assert_eq!(doc.get_i64("age").unwrap(), 28);
    }

    #[test]
    fn bson_round_trip_preserves_person() {
        let person = NewPerson::named("Mary")
            .age(31)
            .favorite_foods(["salad"])
            .into_person();

        let restored = Person::from_bson(person.to_bson().unwrap()).unwrap();
        assert_eq!(person, restored);
    }

    #[test]
    fn validate_rejects_empty_name() {
        let mut person = NewPerson::named("Alice").into_person();
        person.name.clear();

        let err = person.validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut person = NewPerson::named("Alice").into_person();
        let created = person.created_at;
        person.updated_at = DateTime::from_millis(0);

        person.touch();
        assert!(person.updated_at > DateTime::from_millis(0));
        assert_eq!(person.created_at, created);
    }

    #[test]
    fn summary_deserializes_from_projected_document() {
        let projected = doc! {
            "_id": Uuid::new(),
            "name": "John",
            "favoriteFoods": ["burritos", "steak"],
            "createdAt": DateTime::now(),
            "updatedAt": DateTime::now(),
        };

        let summary: PersonSummary =
            bson::de::deserialize_from_bson(Bson::Document(projected)).unwrap();
        assert_eq!(summary.name, "John");
        assert_eq!(summary.favorite_foods, vec!["burritos", "steak"]);
    }
}
