use crate::config;
use crate::error::RemoteError;
use crate::insights::InsightSource;
use crate::models::{DailyPick, MarketCallResult, NewsItem, PredictionBundle};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;

// -----------------------------------------------
// CLIENT FOR THE PERSISTED INSIGHTS BACKEND
// -----------------------------------------------
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }

    /// Client for `INSIGHTS_BACKEND_URL`, `None` when it is not configured
    pub fn from_env() -> Result<Option<Self>, RemoteError> {
        config::get_backend_url().map(Self::new).transpose()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One GET, no retry. Fallback to the local engine is the caller's job.
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        tracing::debug!(url, "remote fetch");

        let res = self.client.get(url).send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            let preview: String = text.chars().take(200).collect();
            return Err(RemoteError::Status(status.as_u16(), preview));
        }

        // Validate JSON (object, array or a bare null)
        let trimmed = text.trim();
        if !trimmed.starts_with('{') && !trimmed.starts_with('[') && trimmed != "null" {
            let preview: String = text.chars().take(200).collect();
            return Err(RemoteError::NonJsonResponse(preview));
        }

        Ok(serde_json::from_str(trimmed)?)
    }
}

#[async_trait]
impl InsightSource for RemoteClient {
    async fn historical_predictions(&self, symbol: &str) -> Result<Vec<PredictionBundle>, RemoteError> {
        self.fetch_json(&config::predictions_url(&self.base_url, symbol)).await
    }

    async fn news_articles(&self) -> Result<Vec<NewsItem>, RemoteError> {
        self.fetch_json(&config::endpoint_url(&self.base_url, config::NEWS_PATH)).await
    }

    async fn market_calls(&self) -> Result<Vec<MarketCallResult>, RemoteError> {
        self.fetch_json(&config::endpoint_url(&self.base_url, config::MARKET_CALLS_PATH)).await
    }

    async fn latest_daily_picks(&self) -> Result<Vec<DailyPick>, RemoteError> {
        // the backend answers `null` before the first picks are stored
        let picks: Option<Vec<DailyPick>> =
            self.fetch_json(&config::endpoint_url(&self.base_url, config::DAILY_PICKS_PATH)).await?;
        Ok(picks.unwrap_or_default())
    }
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client, RemoteError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    Ok(Client::builder()
        .default_headers(headers)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()?)
}
