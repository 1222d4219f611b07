pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;
#[cfg(feature = "postgrest-store")]
pub mod postgrest;

use std::sync::Arc;

use crate::config::StorageSettings;
use crate::dao::models::{NewRankingEntity, RankingEntity, RankingQuery};
use crate::dao::storage::{StorageError, StorageResult};
use futures::future::BoxFuture;

pub use memory::MemoryRankingStore;

/// Abstraction over the single `rankings` table: insert-with-return plus filtered, ordered reads.
pub trait RankingStore: Send + Sync {
    fn insert(&self, ranking: NewRankingEntity) -> BoxFuture<'static, StorageResult<RankingEntity>>;
    fn find(&self, query: RankingQuery) -> BoxFuture<'static, StorageResult<Vec<RankingEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Open the ranking store described by `settings`.
pub async fn connect(settings: StorageSettings) -> StorageResult<Arc<dyn RankingStore>> {
    match settings {
        StorageSettings::Memory => Ok(Arc::new(MemoryRankingStore::new())),
        #[cfg(feature = "mongo-store")]
        StorageSettings::Mongo { uri, database } => {
            let config = self::mongodb::MongoConfig::from_uri(&uri, database.as_deref()).await?;
            let store = self::mongodb::MongoRankingStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "postgrest-store")]
        StorageSettings::Postgrest {
            base_url,
            table,
            api_key,
        } => {
            let mut config = postgrest::PostgrestConfig::new(base_url, table);
            if let Some(key) = api_key {
                config = config.with_api_key(key);
            }
            let store = postgrest::PostgrestRankingStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        #[allow(unreachable_patterns)]
        other => Err(StorageError::Unsupported {
            backend: other.backend_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_settings_open_an_empty_store() {
        let store = connect(StorageSettings::Memory).await.unwrap();
        assert!(store.health_check().await.is_ok());
        assert!(store.find(RankingQuery::default()).await.unwrap().is_empty());
    }
}
