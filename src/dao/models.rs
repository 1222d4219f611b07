use std::time::SystemTime;

use uuid::Uuid;

use crate::game::GridSize;

/// Persisted score submission. Records are never updated once written.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntity {
    /// Identifier assigned by the storage backend.
    pub id: Uuid,
    /// Insertion timestamp assigned by the storage backend.
    pub created_at: SystemTime,
    /// Trimmed player name, stored with its original casing.
    pub name: String,
    /// Completion time in seconds.
    pub time: f64,
    /// Board the score was achieved on (persisted as `NxN`).
    pub game_mode: GridSize,
}

/// Ranking fields supplied by the caller before the backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRankingEntity {
    pub name: String,
    pub time: f64,
    pub game_mode: GridSize,
}

/// Column used to order query results, always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingOrder {
    /// Fastest first.
    #[default]
    TimeAscending,
    /// Oldest first.
    CreatedAtAscending,
}

/// Equality filters, ordering and limit for a single-table ranking query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankingQuery {
    /// Only keep records for this board.
    pub game_mode: Option<GridSize>,
    /// Only keep records whose name matches exactly (case-sensitive).
    pub name: Option<String>,
    pub order: RankingOrder,
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
}

impl RankingQuery {
    /// All records ordered by time, optionally restricted to one board.
    pub fn by_time(game_mode: Option<GridSize>) -> Self {
        Self {
            game_mode,
            ..Self::default()
        }
    }

    /// Every record of one player, oldest first.
    pub fn history(name: impl Into<String>, game_mode: Option<GridSize>) -> Self {
        Self {
            game_mode,
            name: Some(name.into()),
            order: RankingOrder::CreatedAtAscending,
            limit: None,
        }
    }

    /// Whether `entity` passes the equality filters of this query.
    pub fn matches(&self, entity: &RankingEntity) -> bool {
        self.game_mode.is_none_or(|mode| entity.game_mode == mode)
            && self
                .name
                .as_deref()
                .is_none_or(|name| entity.name == name)
    }
}
