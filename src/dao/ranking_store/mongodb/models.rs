use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::dao::models::{RankingEntity, RankingOrder, RankingQuery};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRankingDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub created_at: DateTime,
    pub name: String,
    pub time: f64,
    pub game_mode: String,
}

impl From<RankingEntity> for MongoRankingDocument {
    fn from(value: RankingEntity) -> Self {
        Self {
            id: value.id,
            created_at: DateTime::from_system_time(value.created_at),
            name: value.name,
            time: value.time,
            game_mode: value.game_mode.game_mode(),
        }
    }
}

impl TryFrom<MongoRankingDocument> for RankingEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoRankingDocument) -> Result<Self, Self::Error> {
        let game_mode = value
            .game_mode
            .parse()
            .map_err(|err| MongoDaoError::InvalidDocument {
                message: format!("ranking `{}`: {err}", value.id),
            })?;

        Ok(Self {
            id: value.id,
            created_at: value.created_at.to_system_time(),
            name: value.name,
            time: value.time,
            game_mode,
        })
    }
}

/// Equality filter document for the query.
pub fn filter_document(query: &RankingQuery) -> Document {
    let mut filter = Document::new();
    if let Some(mode) = query.game_mode {
        filter.insert("game_mode", mode.game_mode());
    }
    if let Some(name) = &query.name {
        filter.insert("name", name.as_str());
    }
    filter
}

/// Sort document; `created_at` doubles as the tie-breaker for equal times.
pub fn sort_document(order: RankingOrder) -> Document {
    match order {
        RankingOrder::TimeAscending => doc! { "time": 1, "created_at": 1 },
        RankingOrder::CreatedAtAscending => doc! { "created_at": 1 },
    }
}
