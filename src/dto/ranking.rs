use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::RankingEntity,
    dto::{
        format_system_time,
        validation::{validate_game_mode, validate_player_name},
    },
    game::GridSize,
};

/// Score submission sent once a game is complete.
///
/// Every field is optional at the wire level so that missing values surface as a
/// descriptive client error instead of a deserialization failure.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmitScoreRequest {
    /// Player name; surrounding whitespace is trimmed before storage.
    #[serde(default)]
    pub name: Option<String>,
    /// Completion time in seconds.
    #[serde(default)]
    pub time: Option<f64>,
    /// Grid side length (4, 5 or 6), as a number or a numeric string.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<u8>)]
    pub game_mode: Option<u8>,
}

/// Query parameters accepted by `GET /rankings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RankingsQuery {
    /// Grid side length (`4`) or full label (`4x4`); omitted means every mode.
    pub game_mode: Option<String>,
    /// When present, return this player's history instead of the leaderboard.
    pub name: Option<String>,
}

impl RankingsQuery {
    /// Parsed grid size; an empty parameter counts as absent.
    pub fn grid_size(&self) -> Option<GridSize> {
        self.game_mode
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .and_then(|value| value.parse().ok())
    }
}

impl Validate for RankingsQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref mode) = self.game_mode {
            if !mode.trim().is_empty() {
                if let Err(e) = validate_game_mode(mode) {
                    errors.add("game_mode", e);
                }
            }
        }

        if let Some(ref name) = self.name {
            if let Err(e) = validate_player_name(name) {
                errors.add("name", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// One ranking record as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankingResponse {
    pub id: Uuid,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub name: String,
    /// Completion time in seconds.
    pub time: f64,
    /// Board label such as `4x4`.
    pub game_mode: String,
}

impl From<RankingEntity> for RankingResponse {
    fn from(entity: RankingEntity) -> Self {
        Self {
            id: entity.id,
            created_at: format_system_time(entity.created_at),
            name: entity.name,
            time: entity.time,
            game_mode: entity.game_mode.game_mode(),
        }
    }
}

/// A single point of a player's progress over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntryResponse {
    pub time: f64,
    pub created_at: String,
}

impl From<RankingEntity> for HistoryEntryResponse {
    fn from(entity: RankingEntity) -> Self {
        Self {
            time: entity.time,
            created_at: format_system_time(entity.created_at),
        }
    }
}

/// Body of `GET /rankings`: a leaderboard, or a player history when `name` is given.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RankingsResponse {
    Leaderboard(Vec<RankingResponse>),
    History(Vec<HistoryEntryResponse>),
}
