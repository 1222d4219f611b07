use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tokio::time::sleep;
use tracing::debug;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_DATABASE: &str = "find_numbers";
const APP_NAME: &str = "find-numbers-back";
/// Bounds a single connect so the storage supervisor keeps control of the overall backoff.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(3);
const PING_ATTEMPTS: u32 = 3;
const PING_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Parsed connection string plus the database holding the `rankings` collection.
#[derive(Clone)]
pub struct MongoConfig {
    options: ClientOptions,
    database_name: String,
}

impl MongoConfig {
    /// Parse `uri`; `db_name` defaults to `find_numbers`.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let mut options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;
        options.app_name.get_or_insert_with(|| APP_NAME.to_owned());
        options
            .server_selection_timeout
            .get_or_insert(SERVER_SELECTION_TIMEOUT);

        Ok(Self {
            options,
            database_name: db_name.unwrap_or(DEFAULT_DATABASE).to_owned(),
        })
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Open a client and return it once the database answers a ping.
    pub(super) async fn open(&self) -> MongoResult<(Client, Database)> {
        let client = Client::with_options(self.options.clone())
            .map_err(|source| MongoDaoError::ClientConstruction { source })?;
        let database = client.database(&self.database_name);

        let mut attempt = 1;
        loop {
            let err = match database.run_command(doc! { "ping": 1 }).await {
                Ok(_) => return Ok((client, database)),
                Err(err) => err,
            };
            if attempt == PING_ATTEMPTS {
                return Err(MongoDaoError::InitialPing {
                    attempts: attempt,
                    source: err,
                });
            }
            debug!(attempt, database = %self.database_name, error = %err, "MongoDB ping failed; retrying");
            sleep(PING_RETRY_DELAY * attempt).await;
            attempt += 1;
        }
    }
}
