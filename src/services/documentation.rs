use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Find Numbers Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::rankings::get_rankings,
        crate::routes::rankings::submit_score,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::ranking::SubmitScoreRequest,
            crate::dto::ranking::RankingResponse,
            crate::dto::ranking::HistoryEntryResponse,
            crate::dto::ranking::RankingsResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rankings", description = "Leaderboards, player history and score submission"),
    )
)]
pub struct ApiDoc;
