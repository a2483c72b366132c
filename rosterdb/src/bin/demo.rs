//! Runs the ten roster operations once, in order, against MongoDB.
//!
//! Reads `MONGO_URI` (required) and `MONGO_DB` (optional) from the
//! environment, connects eagerly, and walks the full create, read, update,
//! and delete sequence, logging one line per step. On any failure the
//! remaining steps are skipped; the connection is released either way.

use rosterdb::{mongodb::MongoDbStore, prelude::*};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> StoreResult<()> {
    let config = Config::from_env()?;

    let store = DocumentStore::new(
        MongoDbStore::builder(&config.mongo_uri, &config.database)
            .build()
            .await?,
    );
    info!("connected to database {:?}", config.database);

    let outcome = drive(&store).await;
    if let Err(err) = &outcome {
        error!("aborting remaining steps: {err}");
    }

    store.shutdown().await?;
    info!("connection closed");

    outcome
}

async fn drive<B: StoreBackend>(store: &DocumentStore<B>) -> StoreResult<()> {
    let people = PeopleOps::new(store);

    let alice = people
        .create(
            NewPerson::named("Alice")
                .age(28)
                .favorite_foods(["sushi", "burritos"]),
        )
        .await?;
    info!("created {} ({})", alice.name, alice.id);

    let created = people
        .create_many(vec![
            NewPerson::named("John").age(25).favorite_foods(["pizza", "burritos"]),
            NewPerson::named("Mary").age(31).favorite_foods(["salad"]),
            NewPerson::named("John").age(40).favorite_foods(["burritos", "steak"]),
        ])
        .await?;
    info!("created {} more people", created.len());

    let johns = people.find_by_name("John").await?;
    info!("found {} people named John", johns.len());

    match people.find_one_by_food("burritos").await? {
        Some(person) => info!("first burritos fan: {}", person.name),
        None => info!("nobody likes burritos"),
    }

    match people.find_by_id(alice.id).await? {
        Some(person) => info!("looked up {} by id", person.name),
        None => info!("no person with id {}", alice.id),
    }

    let alice = people.add_favorite_food(alice.id, "hamburger").await?;
    info!("{} now likes {:?}", alice.name, alice.favorite_foods);

    match people.set_age_by_name("John", 20).await? {
        Some(person) => info!("{} is now {}", person.name, person.age),
        None => info!("nobody named John to update"),
    }

    match people.delete_by_id(alice.id).await? {
        Some(person) => info!("deleted {}", person.name),
        None => info!("no person with id {} to delete", alice.id),
    }

    let summary = people.delete_by_name("Mary").await?;
    info!("removed {} people named Mary", summary.deleted_count);

    let shortlist = people.shortlist_by_food("burritos").await?;
    info!("shortlisted {} burritos fans", shortlist.len());
    for person in &shortlist {
        info!("  {} likes {:?}", person.name, person.favorite_foods);
    }

    Ok(())
}
