//! Ranking use cases: score submission, best-per-player leaderboards and player history.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{
    dao::models::{NewRankingEntity, RankingEntity, RankingQuery},
    dto::ranking::{HistoryEntryResponse, RankingResponse, SubmitScoreRequest},
    error::ServiceError,
    game::GridSize,
    state::SharedState,
};

const MISSING_FIELDS: &str = "missing name, time, or game_mode";

/// Validate and persist one score, returning the stored record(s).
pub async fn submit_score(
    state: &SharedState,
    request: SubmitScoreRequest,
) -> Result<Vec<RankingResponse>, ServiceError> {
    let ranking = build_new_ranking(request)?;
    let store = state.require_ranking_store().await?;

    let stored = store.insert(ranking).await?;
    info!(
        id = %stored.id,
        name = %stored.name,
        time = stored.time,
        game_mode = %stored.game_mode,
        "score submitted"
    );

    Ok(vec![stored.into()])
}

/// Fastest time per player (case-insensitive), fastest first, at most `limit` entries.
pub async fn list_leaderboard(
    state: &SharedState,
    game_mode: Option<GridSize>,
    limit: usize,
) -> Result<Vec<RankingResponse>, ServiceError> {
    let store = state.require_ranking_store().await?;
    let candidates = store.find(RankingQuery::by_time(game_mode)).await?;
    debug!(
        game_mode = ?game_mode,
        candidates = candidates.len(),
        "building leaderboard"
    );

    Ok(best_per_player(candidates, limit)
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Every submission of `name` (exact match), oldest first.
pub async fn list_player_history(
    state: &SharedState,
    name: &str,
    game_mode: Option<GridSize>,
) -> Result<Vec<HistoryEntryResponse>, ServiceError> {
    let store = state.require_ranking_store().await?;
    let rows = store.find(RankingQuery::history(name, game_mode)).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

fn build_new_ranking(request: SubmitScoreRequest) -> Result<NewRankingEntity, ServiceError> {
    let SubmitScoreRequest {
        name,
        time,
        game_mode,
    } = request;

    let name = name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let time = time.filter(|time| *time != 0.0);
    let game_mode = game_mode.filter(|mode| *mode != 0);

    let (Some(name), Some(time), Some(game_mode)) = (name, time, game_mode) else {
        return Err(ServiceError::InvalidInput(MISSING_FIELDS.into()));
    };

    if !time.is_finite() || time < 0.0 {
        return Err(ServiceError::InvalidInput(format!(
            "time must be a positive number of seconds (got {time})"
        )));
    }

    let game_mode = GridSize::try_from(game_mode)
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    Ok(NewRankingEntity {
        name: name.to_owned(),
        time,
        game_mode,
    })
}

/// Keep the lowest time of every player, compared case-insensitively.
///
/// Equal times keep the order in which the candidates were retrieved.
fn best_per_player(candidates: Vec<RankingEntity>, limit: usize) -> Vec<RankingEntity> {
    let mut best: IndexMap<String, RankingEntity> = IndexMap::new();

    for candidate in candidates {
        let key = candidate.name.to_lowercase();
        match best.get_mut(&key) {
            Some(current) if candidate.time < current.time => *current = candidate,
            Some(_) => {}
            None => {
                best.insert(key, candidate);
            }
        }
    }

    let mut entries: Vec<RankingEntity> = best.into_values().collect();
    entries.sort_by(|a, b| a.time.total_cmp(&b.time));
    entries.truncate(limit);
    entries
}
