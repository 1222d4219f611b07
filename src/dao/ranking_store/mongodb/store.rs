use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, IndexModel, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
    models::{MongoRankingDocument, filter_document, sort_document},
};
use crate::dao::{
    models::{NewRankingEntity, RankingEntity, RankingQuery},
    ranking_store::RankingStore,
    storage::StorageResult,
};

const RANKING_COLLECTION_NAME: &str = "rankings";

#[derive(Clone)]
pub struct MongoRankingStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) = self.config.open().await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoRankingStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = config.open().await?;
        debug!(database = config.database_name(), "connected to MongoDB");

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;

        let indexes = [
            (
                doc! { "game_mode": 1, "time": 1 },
                "ranking_mode_time_idx",
                "game_mode,time",
            ),
            (
                doc! { "name": 1, "created_at": 1 },
                "ranking_name_created_idx",
                "name,created_at",
            ),
        ];

        for (keys, name, index) in indexes {
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(Some(name.to_owned())).build())
                .build();

            collection
                .create_index(model)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection: RANKING_COLLECTION_NAME,
                    index,
                    source,
                })?;
        }

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoRankingDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoRankingDocument>(RANKING_COLLECTION_NAME)
    }

    async fn insert(&self, ranking: NewRankingEntity) -> MongoResult<RankingEntity> {
        let entity = RankingEntity {
            id: Uuid::new_v4(),
            created_at: SystemTime::now(),
            name: ranking.name,
            time: ranking.time,
            game_mode: ranking.game_mode,
        };
        let document = MongoRankingDocument::from(entity.clone());

        self.collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertRanking {
                name: entity.name.clone(),
                source,
            })?;

        // Round-trip through BSON so the returned timestamp carries the stored millisecond precision.
        RankingEntity::try_from(document)
    }

    async fn find(&self, query: RankingQuery) -> MongoResult<Vec<RankingEntity>> {
        let collection = self.collection().await;
        let filter = filter_document(&query);
        debug!(filter = %filter, order = ?query.order, limit = ?query.limit, "querying rankings");

        let mut action = collection.find(filter).sort(sort_document(query.order));
        if let Some(limit) = query.limit {
            action = action.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let documents: Vec<MongoRankingDocument> = action
            .await
            .map_err(|source| MongoDaoError::FindRankings { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::FindRankings { source })?;

        documents.into_iter().map(RankingEntity::try_from).collect()
    }
}

impl RankingStore for MongoRankingStore {
    fn insert(&self, ranking: NewRankingEntity) -> BoxFuture<'static, StorageResult<RankingEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert(ranking).await.map_err(Into::into) })
    }

    fn find(&self, query: RankingQuery) -> BoxFuture<'static, StorageResult<Vec<RankingEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find(query).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
