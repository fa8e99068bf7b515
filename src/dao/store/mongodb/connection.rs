//! Connection bootstrap: wait for the server, then make sure the indexes the store relies on exist.

use std::time::Duration;

use mongodb::{
    Client, Database, IndexModel,
    bson::{Document, doc},
    options::{ClientOptions, IndexOptions},
};
use tokio::time::sleep;
use tracing::debug;

use super::error::{MongoDaoError, MongoResult};

pub const SCORE_COLLECTION_NAME: &str = "high_scores";
pub const SESSION_COLLECTION_NAME: &str = "game_sessions";
pub const COUNTER_COLLECTION_NAME: &str = "counters";

const MAX_PING_ATTEMPTS: u32 = 10;
const FIRST_RETRY_DELAY: Duration = Duration::from_millis(250);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Build a client for `database_name` and wait until the server answers a ping.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);

    let mut delay = FIRST_RETRY_DELAY;
    let mut attempt = 1;
    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => return Ok((client, database)),
            Err(source) if attempt >= MAX_PING_ATTEMPTS => {
                return Err(MongoDaoError::InitialPing {
                    attempts: attempt,
                    source,
                });
            }
            Err(err) => {
                debug!(attempt, error = %err, "MongoDB ping failed; retrying");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Create the ranking index on scores and the unique `session_id` index on sessions.
pub async fn ensure_indexes(database: &Database) -> MongoResult<()> {
    create_index(
        database,
        SCORE_COLLECTION_NAME,
        "mode,score",
        index(doc! {"mode": 1, "score": -1, "_id": 1}, "score_mode_rank_idx", false),
    )
    .await?;

    create_index(
        database,
        SESSION_COLLECTION_NAME,
        "session_id",
        index(doc! {"session_id": 1}, "session_id_unique_idx", true),
    )
    .await
}

fn index(keys: Document, name: &str, unique: bool) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .name(Some(name.to_owned()))
                .unique(unique.then_some(true))
                .build(),
        )
        .build()
}

async fn create_index(
    database: &Database,
    collection: &'static str,
    label: &'static str,
    model: IndexModel,
) -> MongoResult<()> {
    database
        .collection::<Document>(collection)
        .create_index(model)
        .await
        .map_err(|source| MongoDaoError::EnsureIndex {
            collection,
            index: label,
            source,
        })?;
    Ok(())
}
