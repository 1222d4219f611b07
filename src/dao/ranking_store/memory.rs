//! Process-local ranking store, used when no database is configured and by tests.

use std::{sync::Arc, time::SystemTime};

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::RankingStore;
use crate::dao::{
    models::{NewRankingEntity, RankingEntity, RankingOrder, RankingQuery},
    storage::StorageResult,
};

/// Rankings kept in insertion order behind a shared lock.
#[derive(Clone, Default)]
pub struct MemoryRankingStore {
    rows: Arc<RwLock<Vec<RankingEntity>>>,
}

impl MemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert(&self, ranking: NewRankingEntity) -> RankingEntity {
        let entity = RankingEntity {
            id: Uuid::new_v4(),
            created_at: SystemTime::now(),
            name: ranking.name,
            time: ranking.time,
            game_mode: ranking.game_mode,
        };
        self.rows.write().await.push(entity.clone());
        entity
    }

    async fn find(&self, query: RankingQuery) -> Vec<RankingEntity> {
        let mut rows: Vec<RankingEntity> = {
            let guard = self.rows.read().await;
            guard
                .iter()
                .filter(|row| query.matches(row))
                .cloned()
                .collect()
        };

        // Rows are already in insertion order, so the stable sort keeps ties chronological.
        match query.order {
            RankingOrder::TimeAscending => rows.sort_by(|a, b| a.time.total_cmp(&b.time)),
            RankingOrder::CreatedAtAscending => rows.sort_by_key(|row| row.created_at),
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        rows
    }
}

impl RankingStore for MemoryRankingStore {
    fn insert(&self, ranking: NewRankingEntity) -> BoxFuture<'static, StorageResult<RankingEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.insert(ranking).await) })
    }

    fn find(&self, query: RankingQuery) -> BoxFuture<'static, StorageResult<Vec<RankingEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.find(query).await) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GridSize;

    fn new_ranking(name: &str, time: f64, game_mode: GridSize) -> NewRankingEntity {
        NewRankingEntity {
            name: name.into(),
            time,
            game_mode,
        }
    }

    #[tokio::test]
    async fn insert_assigns_identity() {
        let store = MemoryRankingStore::new();
        let first = RankingStore::insert(&store, new_ranking("ann", 3.5, GridSize::Four))
            .await
            .unwrap();
        let second = RankingStore::insert(&store, new_ranking("ann", 3.5, GridSize::Four))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.name, "ann");
        assert_eq!(first.game_mode, GridSize::Four);
    }

    #[tokio::test]
    async fn find_filters_orders_and_limits() {
        let store = MemoryRankingStore::new();
        for (name, time, mode) in [
            ("a", 9.0, GridSize::Four),
            ("b", 3.0, GridSize::Four),
            ("c", 1.0, GridSize::Five),
            ("d", 5.0, GridSize::Four),
        ] {
            RankingStore::insert(&store, new_ranking(name, time, mode))
                .await
                .unwrap();
        }

        let query = RankingQuery {
            limit: Some(2),
            ..RankingQuery::by_time(Some(GridSize::Four))
        };
        let rows = RankingStore::find(&store, query).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d"]);
    }

    #[tokio::test]
    async fn history_is_chronological() {
        let store = MemoryRankingStore::new();
        for time in [7.0, 2.0, 4.0] {
            RankingStore::insert(&store, new_ranking("eve", time, GridSize::Six))
                .await
                .unwrap();
        }
        RankingStore::insert(&store, new_ranking("Eve", 1.0, GridSize::Six))
            .await
            .unwrap();

        let rows = RankingStore::find(&store, RankingQuery::history("eve", None))
            .await
            .unwrap();
        let times: Vec<f64> = rows.iter().map(|row| row.time).collect();
        assert_eq!(times, vec![7.0, 2.0, 4.0]);
    }
}
