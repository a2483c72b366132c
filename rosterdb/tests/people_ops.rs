//! Behavior tests for the person operation library over the in-memory backend.

use bson::Uuid;
use rosterdb::{memory::InMemoryStore, prelude::*};

async fn fresh_store() -> DocumentStore<InMemoryStore> {
    DocumentStore::new(
        InMemoryStore::builder()
            .build()
            .await
            .expect("memory backend should build"),
    )
}

#[tokio::test]
async fn create_applies_declared_defaults() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let lone = people.create(NewPerson::named("Lone")).await.unwrap();

    assert_eq!(lone.age, 0);
    assert!(lone.favorite_foods.is_empty());
    assert_eq!(lone.created_at, lone.updated_at);
}

#[tokio::test]
async fn create_rejects_empty_name() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let err = people.create(NewPerson::named("")).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn create_many_rejects_whole_batch_on_one_bad_draft() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let err = people
        .create_many(vec![NewPerson::named("Good"), NewPerson::named("")])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // The valid draft must not have been written either
    assert!(people.find_by_name("Good").await.unwrap().is_empty());
}

#[tokio::test]
async fn create_many_returns_people_in_input_order() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let created = people
        .create_many(vec![
            NewPerson::named("John").age(25),
            NewPerson::named("Mary").age(31),
            NewPerson::named("John").age(40),
        ])
        .await
        .unwrap();

    let names: Vec<&str> = created.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["John", "Mary", "John"]);
}

#[tokio::test]
async fn created_person_round_trips_by_id() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let alice = people
        .create(
            NewPerson::named("Alice")
                .age(28)
                .favorite_foods(["sushi", "burritos"]),
        )
        .await
        .unwrap();

    let found = people.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(found, alice);
}

#[tokio::test]
async fn find_by_id_of_unknown_is_none() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    assert_eq!(people.find_by_id(Uuid::new()).await.unwrap(), None);
}

#[tokio::test]
async fn find_by_name_matches_exactly() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    people
        .create_many(vec![
            NewPerson::named("John").age(25),
            NewPerson::named("Johnny").age(12),
            NewPerson::named("John").age(40),
        ])
        .await
        .unwrap();

    let johns = people.find_by_name("John").await.unwrap();
    assert_eq!(johns.len(), 2);
    assert!(johns.iter().all(|p| p.name == "John"));

    assert!(people.find_by_name("Jo").await.unwrap().is_empty());
}

#[tokio::test]
async fn find_one_by_food_picks_first_in_insertion_order() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    people
        .create(NewPerson::named("Alice").favorite_foods(["sushi"]))
        .await
        .unwrap();
    let first_fan = people
        .create(NewPerson::named("John").favorite_foods(["pizza", "burritos"]))
        .await
        .unwrap();
    people
        .create(NewPerson::named("Mary").favorite_foods(["burritos"]))
        .await
        .unwrap();

    let found = people.find_one_by_food("burritos").await.unwrap().unwrap();
    assert_eq!(found.id, first_fan.id);
}

#[tokio::test]
async fn find_one_by_food_without_match_is_none() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    people
        .create(NewPerson::named("Alice").favorite_foods(["sushi"]))
        .await
        .unwrap();

    assert_eq!(people.find_one_by_food("natto").await.unwrap(), None);
}

#[tokio::test]
async fn add_favorite_food_appends_and_saves() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let created = people
        .create(NewPerson::named("Alice").age(28).favorite_foods(["sushi"]))
        .await
        .unwrap();

    let updated = people
        .add_favorite_food(created.id, "hamburger")
        .await
        .unwrap();
    assert_eq!(updated.favorite_foods, vec!["sushi", "hamburger"]);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.age, created.age);
    assert_eq!(updated.id, created.id);
    assert!(updated.updated_at >= created.updated_at);

    // The edit must be persisted, not just returned
    let reloaded = people.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.favorite_foods, vec!["sushi", "hamburger"]);
}

#[tokio::test]
async fn add_favorite_food_on_unknown_id_fails_without_writing() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    people
        .create(NewPerson::named("Alice").favorite_foods(["sushi"]))
        .await
        .unwrap();

    let err = people
        .add_favorite_food(Uuid::new(), "hamburger")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_, _)));

    let found = people.find_by_name("Alice").await.unwrap();
    assert_eq!(found[0].favorite_foods, vec!["sushi"]);
}

#[tokio::test]
async fn set_age_by_name_updates_exactly_the_first_match() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let created = people
        .create_many(vec![
            NewPerson::named("John").age(25),
            NewPerson::named("Mary").age(31),
            NewPerson::named("John").age(40),
        ])
        .await
        .unwrap();

    let updated = people.set_age_by_name("John", 20).await.unwrap().unwrap();
    assert_eq!(updated.age, 20);
    assert_eq!(updated.id, created[0].id);

    let mut ages: Vec<i64> = people
        .find_by_name("John")
        .await
        .unwrap()
        .iter()
        .map(|p| p.age)
        .collect();
    ages.sort_unstable();
    assert_eq!(ages, vec![20, 40]);
}

#[tokio::test]
async fn set_age_by_name_without_match_is_none() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    assert_eq!(people.set_age_by_name("John", 20).await.unwrap(), None);
}

#[tokio::test]
async fn delete_by_id_returns_pre_deletion_snapshot() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let alice = people
        .create(NewPerson::named("Alice").age(28).favorite_foods(["sushi"]))
        .await
        .unwrap();

    let removed = people.delete_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(removed, alice);

    assert_eq!(people.find_by_id(alice.id).await.unwrap(), None);
    assert_eq!(people.delete_by_id(alice.id).await.unwrap(), None);
}

#[tokio::test]
async fn delete_by_name_removes_all_matches_and_counts() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    people
        .create_many(vec![
            NewPerson::named("Mary").age(31),
            NewPerson::named("John").age(25),
            NewPerson::named("Mary").age(54),
        ])
        .await
        .unwrap();

    let summary = people.delete_by_name("Mary").await.unwrap();
    assert_eq!(summary.deleted_count, 2);
    assert!(summary.acknowledged);

    assert!(people.find_by_name("Mary").await.unwrap().is_empty());
    assert_eq!(people.find_by_name("John").await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_by_name_without_match_counts_zero() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let summary = people.delete_by_name("Mary").await.unwrap();
    assert_eq!(summary.deleted_count, 0);
}

#[tokio::test]
async fn shortlist_caps_orders_and_projects() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    people
        .create_many(vec![
            NewPerson::named("Zoe").favorite_foods(["burritos"]),
            NewPerson::named("Ben").favorite_foods(["pizza"]),
            NewPerson::named("Adam").favorite_foods(["burritos", "steak"]),
            NewPerson::named("Cara").favorite_foods(["salad"]),
            NewPerson::named("Mia").favorite_foods(["sushi", "burritos"]),
        ])
        .await
        .unwrap();

    let shortlist = people.shortlist_by_food("burritos").await.unwrap();

    let names: Vec<&str> = shortlist.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Adam", "Mia"]);
    assert!(shortlist.iter().all(|s| s.favorite_foods.contains(&"burritos".to_string())));
}

#[tokio::test]
async fn demo_sequence_end_to_end() {
    let store = fresh_store().await;
    let people = PeopleOps::new(&store);

    let alice = people
        .create(
            NewPerson::named("Alice")
                .age(28)
                .favorite_foods(["sushi", "burritos"]),
        )
        .await
        .unwrap();

    people
        .create_many(vec![
            NewPerson::named("John").age(25).favorite_foods(["pizza", "burritos"]),
            NewPerson::named("Mary").age(31).favorite_foods(["salad"]),
            NewPerson::named("John").age(40).favorite_foods(["burritos", "steak"]),
        ])
        .await
        .unwrap();

    let johns = people.find_by_name("John").await.unwrap();
    assert_eq!(johns.len(), 2);

    let fan = people.find_one_by_food("burritos").await.unwrap().unwrap();
    assert!(fan.name == "Alice" || fan.name == "John");

    let looked_up = people.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(looked_up.name, "Alice");

    let alice = people
        .add_favorite_food(alice.id, "hamburger")
        .await
        .unwrap();
    assert_eq!(alice.favorite_foods, vec!["sushi", "burritos", "hamburger"]);

    let aged = people.set_age_by_name("John", 20).await.unwrap().unwrap();
    assert_eq!(aged.age, 20);

    let removed = people.delete_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(removed.id, alice.id);

    let summary = people.delete_by_name("Mary").await.unwrap();
    assert_eq!(summary.deleted_count, 1);

    // Only the two Johns remain, both burritos fans
    let shortlist = people.shortlist_by_food("burritos").await.unwrap();
    assert_eq!(shortlist.len(), 2);
    assert!(shortlist.iter().all(|s| s.name == "John"));
    assert_eq!(people.find_by_name("John").await.unwrap().len(), 2);

    store.shutdown().await.unwrap();
}
