//! The person operation library.
//!
//! This module provides [`PeopleOps`], a thin operation layer over the
//! `people` collection. Each operation is a single asynchronous call that
//! issues one request to the storage layer and returns its result directly;
//! callers sequence them with `.await`.
//!
//! Lookups and deletes that match nothing return `None` (or an empty vector,
//! or a zero-count summary). The one exception is
//! [`add_favorite_food`](PeopleOps::add_favorite_food), which loads its target
//! before editing and fails with
//! [`StoreError::NotFound`](rosterdb_core::error::StoreError::NotFound) when
//! the id does not exist: an edit target must exist.
//!
//! # Example
//!
//! ```ignore
//! use rosterdb::{memory::InMemoryStore, ops::PeopleOps, person::NewPerson, store::DocumentStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let people = PeopleOps::new(&store);
//!
//! let alice = people
//!     .create(NewPerson::named("Alice").age(28).favorite_foods(["sushi", "burritos"]))
//!     .await?;
//! let again = people.find_by_id(alice.id).await?;
//! ```

use bson::{DateTime, Uuid};
use tracing::debug;

use rosterdb_core::{
    backend::{DeleteSummary, StoreBackend},
    collection::TypedCollection,
    document::Document,
    error::{StoreError, StoreResult},
    query::{Filter, Query, SortDirection, Update},
    store::DocumentStore,
};

use crate::person::{NewPerson, Person, PersonSummary};

/// Operations over the `people` collection of a document store.
///
/// Borrows the store for its lifetime; construct one per store handle and
/// share it freely. All operations go through the [`Person`] model, so every
/// write is validated before it reaches the backend.
#[derive(Debug)]
pub struct PeopleOps<'a, B: StoreBackend> {
    store: &'a DocumentStore<B>,
}

impl<'a, B: StoreBackend> PeopleOps<'a, B> {
    /// Creates an operation library over the given store.
    pub fn new(store: &'a DocumentStore<B>) -> Self {
        Self { store }
    }

    fn people(&self) -> TypedCollection<'a, B, Person> {
        self.store.collection::<Person>()
    }

    /// Inserts one new person from a draft.
    ///
    /// # Returns
    ///
    /// The created person, including its assigned id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the draft has an empty name, or
    /// another [`StoreError`] if the insert fails.
    pub async fn create(&self, draft: NewPerson) -> StoreResult<Person> {
        let person = draft.into_person();
        self.people().insert(vec![person.clone()]).await?;

        debug!("created person {}", person.id);
        Ok(person)
    }

    /// Inserts a batch of new people from drafts.
    ///
    /// Every draft is validated before anything is written; one bad draft
    /// rejects the whole batch.
    ///
    /// # Returns
    ///
    /// The created people, in input order, including assigned ids.
    pub async fn create_many(&self, drafts: Vec<NewPerson>) -> StoreResult<Vec<Person>> {
        let people: Vec<Person> = drafts.into_iter().map(NewPerson::into_person).collect();
        self.people().insert(people.clone()).await?;

        debug!("created {} people", people.len());
        Ok(people)
    }

    /// Finds all people with exactly the given name.
    pub async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Person>> {
        self.people()
            .query(Query::builder().filter(Filter::eq("name", name)).build())
            .await
    }

    /// Finds the first person whose favorite foods include the given food.
    ///
    /// "First" follows the storage layer's natural order. Returns `None` when
    /// nobody matches.
    pub async fn find_one_by_food(&self, food: &str) -> StoreResult<Option<Person>> {
        self.people()
            .query_first(
                Query::builder()
                    .filter(Filter::contains("favoriteFoods", food))
                    .build(),
            )
            .await
    }

    /// Looks up a person by id. Returns `None` when the id is unknown.
    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Person>> {
        self.people().get(id).await
    }

    /// Loads a person, appends a food to their favorites, and saves the record.
    ///
    /// # Arguments
    ///
    /// * `id` - The id of the person to edit
    /// * `food` - The food appended to `favoriteFoods`
    ///
    /// # Returns
    ///
    /// The updated person as persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no person has this id. Nothing is
    /// written in that case.
    pub async fn add_favorite_food(&self, id: Uuid, food: &str) -> StoreResult<Person> {
        let people = self.people();
        let mut person = people
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id, Person::collection_name().to_string()))?;

        person.favorite_foods.push(food.to_string());
        person.touch();
        people.save(&person).await?;

        debug!("added favorite food {:?} to person {}", food, person.id);
        Ok(person)
    }

    /// Atomically sets the age of the first person with the given name.
    ///
    /// The write also moves `updatedAt`. Returns the post-update state of the
    /// patched person, or `None` when nobody has that name.
    pub async fn set_age_by_name(&self, name: &str, age: i64) -> StoreResult<Option<Person>> {
        let updated = self
            .people()
            .update_first(
                Filter::eq("name", name),
                Update::new().set("age", age).set("updatedAt", DateTime::now()),
            )
            .await?;

        if let Some(person) = &updated {
            debug!("set age {} on person {}", age, person.id);
        }
        Ok(updated)
    }

    /// Removes the person with the given id.
    ///
    /// # Returns
    ///
    /// The removed person in its pre-deletion state, or `None` when the id is
    /// unknown.
    pub async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<Person>> {
        let removed = self.people().remove(id).await?;

        if let Some(person) = &removed {
            debug!("deleted person {}", person.id);
        }
        Ok(removed)
    }

    /// Removes every person with exactly the given name.
    ///
    /// # Returns
    ///
    /// A [`DeleteSummary`] reporting how many records were removed. Removing
    /// zero is a success.
    pub async fn delete_by_name(&self, name: &str) -> StoreResult<DeleteSummary> {
        let summary = self
            .people()
            .remove_matching(Filter::eq("name", name))
            .await?;

        debug!("deleted {} people named {:?}", summary.deleted_count, name);
        Ok(summary)
    }

    /// Shortlists people who like the given food.
    ///
    /// Composed query: filter on `favoriteFoods` containing `food`, order by
    /// `name` ascending, take the first two, and project out the `age` field.
    ///
    /// # Returns
    ///
    /// At most two [`PersonSummary`] records in name order.
    pub async fn shortlist_by_food(&self, food: &str) -> StoreResult<Vec<PersonSummary>> {
        self.people()
            .query_as::<PersonSummary>(
                Query::builder()
                    .filter(Filter::contains("favoriteFoods", food))
                    .sort("name", SortDirection::Asc)
                    .limit(2)
                    .exclude(["age"])
                    .build(),
            )
            .await
    }
}
