//! HTTP client for the ranking endpoints, used by the terminal game.
//!
//! Transport and decoding failures are folded into [`ClientError`], whose
//! `Display` is the short message shown to the player. The underlying
//! [`reqwest::Error`] stays reachable through `source()` for logging.

use std::sync::Arc;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    dto::ranking::{HistoryEntryResponse, RankingResponse, SubmitScoreRequest},
    game::{GridSize, Score},
};

/// Server used when neither `--server` nor `FIND_NUMBERS_SERVER_URL` is set.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Failure surfaced to the player.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The player left the name prompt blank.
    #[error("Please enter your name.")]
    MissingName,
    /// Leaderboard or history could not be fetched.
    #[error("Could not load rankings.")]
    Load {
        #[source]
        source: reqwest::Error,
    },
    /// The score could not be submitted.
    #[error("Could not save score.")]
    Save {
        #[source]
        source: reqwest::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("could not initialise the HTTP client")]
    Builder {
        #[source]
        source: reqwest::Error,
    },
}

/// Thin wrapper over `GET /rankings` and `POST /rankings`.
#[derive(Clone)]
pub struct RankingsClient {
    client: Client,
    base_url: Arc<str>,
}

impl RankingsClient {
    /// Client talking to the server rooted at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|source| ClientError::Builder { source })?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rankings_url(&self) -> String {
        format!("{}/rankings", self.base_url)
    }

    /// Best time of every player on `grid`, fastest first.
    pub async fn fetch_leaderboard(
        &self,
        grid: GridSize,
    ) -> Result<Vec<RankingResponse>, ClientError> {
        let mode = u8::from(grid).to_string();
        debug!(game_mode = %grid, "fetching leaderboard");
        self.get(&[("game_mode", mode)])
            .await
            .map_err(|source| load_failed(source, "leaderboard"))
    }

    /// Every recorded time of `name`, oldest first.
    pub async fn fetch_history(
        &self,
        name: &str,
        grid: Option<GridSize>,
    ) -> Result<Vec<HistoryEntryResponse>, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::MissingName);
        }

        let mut params = vec![("name", name.to_owned())];
        if let Some(grid) = grid {
            params.push(("game_mode", u8::from(grid).to_string()));
        }
        debug!(name, "fetching player history");
        self.get(&params)
            .await
            .map_err(|source| load_failed(source, "history"))
    }

    /// Submit a finished session under `name`.
    pub async fn submit_score(
        &self,
        name: &str,
        score: Score,
    ) -> Result<Vec<RankingResponse>, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::MissingName);
        }

        let payload = SubmitScoreRequest {
            name: Some(name.to_owned()),
            time: Some(score.time_secs),
            game_mode: Some(u8::from(score.grid)),
        };

        let result: Result<Vec<RankingResponse>, reqwest::Error> = async {
            let response = self
                .client
                .post(self.rankings_url())
                .json(&payload)
                .send()
                .await?;
            decode(response).await
        }
        .await;

        result.map_err(|source| {
            warn!(error = %source, "score submission failed");
            ClientError::Save { source }
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<T, reqwest::Error> {
        let response = self
            .client
            .get(self.rankings_url())
            .query(params)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, reqwest::Error> {
    response.error_for_status()?.json::<T>().await
}

fn load_failed(source: reqwest::Error, what: &'static str) -> ClientError {
    warn!(error = %source, what, "ranking fetch failed");
    ClientError::Load { source }
}
