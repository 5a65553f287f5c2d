use async_trait::async_trait;
use dexcache_protocol::{Category, Key, Source, SourceError};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

/// Public PokeAPI v2 endpoint
pub const POKEAPI_URL: &str = "https://pokeapi.co/api/v2";

// Large enough to list every record of a category in one page
const LIST_LIMIT: u32 = 100_000;

/// Fetches records from a PokeAPI-compatible HTTP server
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{category}/{key}/`
    pub fn record_url(&self, category: Category, key: &Key) -> String {
        format!(
            "{}/{}/{}/",
            self.base_url,
            category.path(),
            key.to_path_segment()
        )
    }

    async fn get(&self, url: &str) -> Result<Option<Value>, SourceError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.bytes().await.map_err(|e| transport(url, e))?;
                Ok(Some(serde_json::from_slice(&body)?))
            }
            status => {
                warn!(%url, status = status.as_u16(), "unexpected response status");
                Err(SourceError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                })
            }
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(POKEAPI_URL)
    }
}

#[async_trait]
impl Source for HttpSource {
    async fn fetch(&self, category: Category, key: &Key) -> Result<Option<Value>, SourceError> {
        self.get(&self.record_url(category, key)).await
    }

    async fn list(&self, category: Category) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/{}/?limit={}",
            self.base_url,
            category.path(),
            LIST_LIMIT
        );
        // Every category has a listing; a 404 means the base URL is wrong
        let Some(page) = self.get(&url).await? else {
            warn!(%url, %category, "listing endpoint not found");
            return Err(SourceError::Status {
                url,
                status: StatusCode::NOT_FOUND.as_u16(),
            });
        };

        let names = page
            .get("results")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .filter_map(|entry| entry.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }
}

fn transport(url: &str, err: reqwest::Error) -> SourceError {
    SourceError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}
