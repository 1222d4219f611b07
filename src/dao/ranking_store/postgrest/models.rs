use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use super::error::PostgrestDaoError;
use crate::dao::models::{NewRankingEntity, RankingEntity, RankingOrder, RankingQuery};

/// Row shape returned by `select=*` on the rankings table.
#[derive(Debug, Deserialize)]
pub struct PostgrestRankingRow {
    pub id: Uuid,
    pub created_at: String,
    pub name: String,
    pub time: f64,
    pub game_mode: String,
}

/// Insert payload; `id` and `created_at` are filled in by table defaults.
#[derive(Debug, Serialize)]
pub struct PostgrestRankingInsert {
    pub name: String,
    pub time: f64,
    pub game_mode: String,
}

impl From<NewRankingEntity> for PostgrestRankingInsert {
    fn from(value: NewRankingEntity) -> Self {
        Self {
            name: value.name,
            time: value.time,
            game_mode: value.game_mode.game_mode(),
        }
    }
}

impl TryFrom<PostgrestRankingRow> for RankingEntity {
    type Error = PostgrestDaoError;

    fn try_from(row: PostgrestRankingRow) -> Result<Self, Self::Error> {
        let game_mode = row
            .game_mode
            .parse()
            .map_err(|err| PostgrestDaoError::InvalidRow {
                message: format!("ranking `{}`: {err}", row.id),
            })?;

        Ok(Self {
            id: row.id,
            created_at: parse_timestamp(&row.created_at).map_err(|message| {
                PostgrestDaoError::InvalidRow {
                    message: format!("ranking `{}`: {message}", row.id),
                }
            })?,
            name: row.name,
            time: row.time,
            game_mode,
        })
    }
}

/// PostgREST renders `timestamptz` as RFC 3339, but drops the `T` separator on some setups.
fn parse_timestamp(value: &str) -> Result<SystemTime, String> {
    let normalized = value.replacen(' ', "T", 1);
    OffsetDateTime::parse(&normalized, &Rfc3339)
        .map(SystemTime::from)
        .map_err(|err| format!("invalid created_at `{value}`: {err}"))
}

/// Rows asked for per request. PostgREST deployments usually cap responses (`max-rows`) at 1000.
pub const PAGE_SIZE: usize = 1000;

/// Query-string pairs encoding the filters and ordering of `query`.
fn query_params(query: &RankingQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_owned())];

    if let Some(mode) = query.game_mode {
        params.push(("game_mode", format!("eq.{}", mode.game_mode())));
    }
    if let Some(name) = &query.name {
        params.push(("name", format!("eq.{name}")));
    }

    let order = match query.order {
        RankingOrder::TimeAscending => "time.asc,created_at.asc",
        RankingOrder::CreatedAtAscending => "created_at.asc",
    };
    params.push(("order", order.to_owned()));
    params
}

/// Parameters of the page starting at `offset`, or `None` once `query.limit` rows were read.
///
/// Pages are never larger than [`PAGE_SIZE`]; a capped server answers a shorter page and
/// the caller keeps paging until it gets an empty one.
pub fn page_params(query: &RankingQuery, offset: usize) -> Option<Vec<(&'static str, String)>> {
    let wanted = match query.limit {
        Some(limit) => limit.saturating_sub(offset).min(PAGE_SIZE),
        None => PAGE_SIZE,
    };
    if wanted == 0 {
        return None;
    }

    let mut params = query_params(query);
    params.push(("limit", wanted.to_string()));
    params.push(("offset", offset.to_string()));
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GridSize;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn encodes_leaderboard_query() {
        let query = RankingQuery {
            limit: Some(20),
            ..RankingQuery::by_time(Some(GridSize::Four))
        };
        assert_eq!(
            page_params(&query, 0).unwrap(),
            vec![
                ("select", "*".to_owned()),
                ("game_mode", "eq.4x4".to_owned()),
                ("order", "time.asc,created_at.asc".to_owned()),
                ("limit", "20".to_owned()),
                ("offset", "0".to_owned()),
            ]
        );
        assert_eq!(page_params(&query, 20), None);
    }

    #[test]
    fn encodes_history_query() {
        let params = page_params(&RankingQuery::history("Alice", None), 0).unwrap();
        assert_eq!(param(&params, "name"), Some("eq.Alice"));
        assert_eq!(param(&params, "order"), Some("created_at.asc"));
    }

    #[test]
    fn unbounded_queries_page_past_the_server_cap() {
        let query = RankingQuery::by_time(None);
        let first = page_params(&query, 0).unwrap();
        assert_eq!(param(&first, "limit"), Some("1000"));

        let later = page_params(&query, 1_500).unwrap();
        assert_eq!(param(&later, "limit"), Some("1000"));
        assert_eq!(param(&later, "offset"), Some("1500"));
    }

    #[test]
    fn bounded_queries_stop_at_their_limit() {
        let query = RankingQuery {
            limit: Some(2_500),
            ..RankingQuery::by_time(None)
        };
        let last = page_params(&query, 2_000).unwrap();
        assert_eq!(param(&last, "limit"), Some("500"));
        assert_eq!(page_params(&query, 2_500), None);
    }

    #[test]
    fn maps_row_to_entity() {
        let row = PostgrestRankingRow {
            id: Uuid::new_v4(),
            created_at: "2024-05-01T10:20:30.123456+00:00".into(),
            name: "Alice".into(),
            time: 12.345,
            game_mode: "4x4".into(),
        };
        let entity = RankingEntity::try_from(row).unwrap();
        assert_eq!(entity.game_mode, GridSize::Four);
        assert_eq!(entity.time, 12.345);
    }

    #[test]
    fn accepts_space_separated_timestamps() {
        assert!(parse_timestamp("2024-05-01 10:20:30+00:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }
}
