//! Shared HTTP client for OpenAI-compatible endpoints

use crate::openai::error::{OpenAiError, Result};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Base URL, credentials, and a pooled `reqwest` client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAiError::Client(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a client whose API key is read from `api_key_env`.
    ///
    /// A missing variable is not an error: local servers (Ollama, vLLM)
    /// accept unauthenticated requests.
    pub fn from_env(base_url: &str, api_key_env: &str, timeout: Duration) -> Result<Self> {
        let api_key = std::env::var(api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!("{} is not set, sending requests without credentials", api_key_env);
        }
        Self::new(base_url, api_key, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST `body` as JSON and decode the JSON reply.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        serde_json::from_str(&raw).map_err(|e| OpenAiError::Parse {
            error: e.to_string(),
            raw,
        })
    }
}
