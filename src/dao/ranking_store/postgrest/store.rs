use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    config::PostgrestConfig,
    error::{PostgrestDaoError, PostgrestResult},
    models::{PostgrestRankingInsert, PostgrestRankingRow, page_params},
};
use crate::dao::{
    models::{NewRankingEntity, RankingEntity, RankingQuery},
    ranking_store::RankingStore,
    storage::StorageResult,
};

#[derive(Clone)]
pub struct PostgrestRankingStore {
    client: Client,
    base_url: Arc<str>,
    table: Arc<str>,
    api_key: Option<Arc<str>>,
}

impl PostgrestRankingStore {
    /// Build the HTTP client and check that the rankings table answers.
    pub async fn connect(config: PostgrestConfig) -> PostgrestResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| PostgrestDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            table: Arc::from(config.table),
            api_key: config.api_key.map(Arc::from),
        };

        store.ping().await?;
        Ok(store)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, self.table);
        let builder = self.client.request(method, url);
        match self.api_key {
            Some(ref key) => builder.header("apikey", key.as_ref()).bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> PostgrestResult<Response> {
        let path = self.table.to_string();
        let response = builder
            .send()
            .await
            .map_err(|source| PostgrestDaoError::RequestSend {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(PostgrestDaoError::RequestStatus {
            path,
            status,
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> PostgrestResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|source| PostgrestDaoError::DecodeResponse {
                path: self.table.to_string(),
                source,
            })
    }

    async fn ping(&self) -> PostgrestResult<()> {
        let builder = self
            .request(Method::GET)
            .query(&[("select", "id"), ("limit", "1")]);
        self.send(builder).await.map(|_| ())
    }

    async fn insert(&self, ranking: NewRankingEntity) -> PostgrestResult<RankingEntity> {
        let payload = [PostgrestRankingInsert::from(ranking)];
        let builder = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&payload);

        let response = self.send(builder).await?;
        let rows: Vec<PostgrestRankingRow> = self.decode(response).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(PostgrestDaoError::EmptyInsert)?;
        RankingEntity::try_from(row)
    }

    async fn find(&self, query: RankingQuery) -> PostgrestResult<Vec<RankingEntity>> {
        let mut entities = Vec::new();

        while let Some(params) = page_params(&query, entities.len()) {
            debug!(table = %self.table, ?params, "querying rankings");
            let response = self
                .send(self.request(Method::GET).query(&params))
                .await?;
            let rows: Vec<PostgrestRankingRow> = self.decode(response).await?;
            if rows.is_empty() {
                break;
            }
            for row in rows {
                entities.push(RankingEntity::try_from(row)?);
            }
        }

        Ok(entities)
    }
}

impl RankingStore for PostgrestRankingStore {
    fn insert(&self, ranking: NewRankingEntity) -> BoxFuture<'static, StorageResult<RankingEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert(ranking).await.map_err(Into::into) })
    }

    fn find(&self, query: RankingQuery) -> BoxFuture<'static, StorageResult<Vec<RankingEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find(query).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        // Stateless HTTP: a successful ping is all a reconnect amounts to.
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
