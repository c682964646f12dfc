//! Vector index backed by a Qdrant collection

use crate::qdrant::protocol::{BatchRequest, Envelope, QueryRequest, QueryResult};
use async_trait::async_trait;
use reqwest::Client;
use scholia_application::{IndexPoint, VectorIndex, VectorIndexError, VectorQuery};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub struct QdrantIndex {
    http: Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
}

impl QdrantIndex {
    pub fn new(
        url: &str,
        collection: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, VectorIndexError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VectorIndexError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key,
        })
    }

    fn url(&self, suffix: &str) -> String {
        format!(
            "{}/collections/{}/points/{}",
            self.base_url, self.collection, suffix
        )
    }

    async fn post<B, R>(&self, suffix: &str, body: &B) -> Result<R, VectorIndexError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.http.post(self.url(suffix)).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                VectorIndexError::Unavailable(e.to_string())
            } else {
                VectorIndexError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| VectorIndexError::RequestFailed(e.to_string()))?;
        if !status.is_success() {
            return Err(VectorIndexError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                raw
            )));
        }

        let envelope: Envelope<R> = serde_json::from_str(&raw)
            .map_err(|e| VectorIndexError::InvalidResponse(e.to_string()))?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(&self, query: &VectorQuery) -> Result<Vec<IndexPoint>, VectorIndexError> {
        let result: QueryResult = self.post("query", &QueryRequest::from(query)).await?;
        debug!("Qdrant returned {} points", result.points.len());
        Ok(result.points.into_iter().map(IndexPoint::from).collect())
    }

    async fn search_batch(
        &self,
        queries: &[VectorQuery],
    ) -> Result<Vec<Vec<IndexPoint>>, VectorIndexError> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        let body = BatchRequest {
            searches: queries.iter().map(QueryRequest::from).collect(),
        };
        let results: Vec<QueryResult> = self.post("query/batch", &body).await?;
        if results.len() != queries.len() {
            return Err(VectorIndexError::InvalidResponse(format!(
                "{} results for {} queries",
                results.len(),
                queries.len()
            )));
        }
        Ok(results
            .into_iter()
            .map(|r| r.points.into_iter().map(IndexPoint::from).collect())
            .collect())
    }
}
