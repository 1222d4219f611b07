use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::get,
};
use axum_valid::{Valid, ValidRejection};

use crate::{
    dto::ranking::{RankingResponse, RankingsQuery, RankingsResponse, SubmitScoreRequest},
    error::AppError,
    services::ranking_service,
    state::SharedState,
};

/// Leaderboard, player history and score submission endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/rankings", get(get_rankings).post(submit_score))
}

#[utoipa::path(
    get,
    path = "/rankings",
    tag = "rankings",
    params(RankingsQuery),
    responses(
        (status = 200, description = "Best time per player, or the player's history when `name` is set", body = RankingsResponse),
        (status = 400, description = "Unsupported game mode, blank name or malformed query"),
        (status = 500, description = "Storage failure"),
        (status = 503, description = "Storage unavailable (degraded mode)")
    )
)]
/// Return the leaderboard for a game mode, or one player's submissions over time.
pub async fn get_rankings(
    State(state): State<SharedState>,
    query: Result<Valid<Query<RankingsQuery>>, ValidRejection<QueryRejection>>,
) -> Result<Json<RankingsResponse>, AppError> {
    let Valid(Query(query)) = query?;
    let game_mode = query.grid_size();

    let payload = match query.name.as_deref().map(str::trim) {
        Some(name) => RankingsResponse::History(
            ranking_service::list_player_history(&state, name, game_mode).await?,
        ),
        None => {
            let limit = state.config().leaderboard_limit();
            RankingsResponse::Leaderboard(
                ranking_service::list_leaderboard(&state, game_mode, limit).await?,
            )
        }
    };

    Ok(Json(payload))
}

#[utoipa::path(
    post,
    path = "/rankings",
    tag = "rankings",
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Inserted ranking record", body = [RankingResponse]),
        (status = 400, description = "Missing or invalid name, time or game_mode"),
        (status = 500, description = "Storage failure"),
        (status = 503, description = "Storage unavailable (degraded mode)")
    )
)]
/// Persist a completed game's time.
pub async fn submit_score(
    State(state): State<SharedState>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<Vec<RankingResponse>>, AppError> {
    let Json(request) = payload?;
    let stored = ranking_service::submit_score(&state, request).await?;
    Ok(Json(stored))
}
