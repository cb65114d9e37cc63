use super::daily_picks::select_daily_picks;
use super::market_call::compute_market_call;
use super::news::sample_news;
use super::predictor::synthesize_prediction;
use super::seed::SynthesisContext;
use crate::config;
use crate::error::RemoteError;
use crate::models::{DailyPick, MarketCallResult, NewsItem, PredictionBundle};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Query interface of the persisted insights backend
#[async_trait]
pub trait InsightSource: Send + Sync {
    async fn historical_predictions(&self, symbol: &str) -> Result<Vec<PredictionBundle>, RemoteError>;
    async fn news_articles(&self) -> Result<Vec<NewsItem>, RemoteError>;
    async fn market_calls(&self) -> Result<Vec<MarketCallResult>, RemoteError>;
    async fn latest_daily_picks(&self) -> Result<Vec<DailyPick>, RemoteError>;
}

/// Remote-first access to insights with the local engine as substitute.
///
/// Every public method is infallible: a missing source, a failed or timed
/// out query, and an empty result all resolve to the local answer (or an
/// empty list for history-only queries).
pub struct InsightService {
    source: Option<Arc<dyn InsightSource>>,
    remote_timeout: Duration,
}

impl InsightService {
    pub fn new(source: Option<Arc<dyn InsightSource>>) -> Self {
        Self {
            source,
            remote_timeout: config::REMOTE_TIMEOUT,
        }
    }

    /// Service without a remote source; every answer comes from the local engine
    pub fn local_only() -> Self {
        Self::new(None)
    }

    pub fn with_timeout(mut self, remote_timeout: Duration) -> Self {
        self.remote_timeout = remote_timeout;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.source.is_some()
    }

    /// Single attempt against the source. `None` on absence, error, timeout or empty result.
    async fn attempt<'a, T, F, Fut>(&'a self, what: &str, query: F) -> Option<Vec<T>>
    where
        F: FnOnce(&'a dyn InsightSource) -> Fut,
        Fut: Future<Output = Result<Vec<T>, RemoteError>>,
    {
        let source = self.source.as_deref()?;

        let result = match tokio::time::timeout(self.remote_timeout, query(source)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(self.remote_timeout.as_millis() as u64)),
        };

        match result {
            Ok(items) if items.is_empty() => {
                tracing::debug!(query = what, "remote returned no data, using local engine");
                None
            }
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(query = what, error = %e, "remote query failed, using local engine");
                None
            }
        }
    }

    // -----------------------------------------------
    // PREDICTIONS
    // -----------------------------------------------

    /// Latest stored prediction for `symbol`, or a locally synthesized one
    pub async fn stock_prediction(&self, symbol: &str, ctx: &SynthesisContext) -> PredictionBundle {
        let symbol = config::normalize_symbol(symbol);

        let latest = self
            .attempt("historical_predictions", |s| s.historical_predictions(&symbol))
            .await
            .and_then(|predictions| predictions.into_iter().max_by_key(|p| p.timestamp));

        match latest {
            Some(prediction) => prediction,
            None => synthesize_prediction(&symbol, ctx),
        }
    }

    /// Stored predictions for `symbol`, newest first; empty without a source
    pub async fn historical_predictions(&self, symbol: &str) -> Vec<PredictionBundle> {
        let symbol = config::normalize_symbol(symbol);

        let mut predictions = self
            .attempt("historical_predictions", |s| s.historical_predictions(&symbol))
            .await
            .unwrap_or_default();
        predictions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        predictions
    }

    // -----------------------------------------------
    // NEWS
    // -----------------------------------------------

    /// Stored articles newest first, or the sampled corpus for `symbol`
    pub async fn news_feed(&self, symbol: &str, ctx: &SynthesisContext) -> Vec<NewsItem> {
        match self.attempt("news_articles", |s| s.news_articles()).await {
            Some(mut articles) => {
                articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
                articles
            }
            None => sample_news(&config::normalize_symbol(symbol), ctx),
        }
    }

    // -----------------------------------------------
    // MARKET CALL
    // -----------------------------------------------

    /// Today's call for the market index, always computed locally
    pub fn todays_market_call(&self, ctx: &SynthesisContext) -> MarketCallResult {
        let bundle = synthesize_prediction(config::MARKET_INDEX_SYMBOL, ctx);
        let articles = sample_news(config::MARKET_INDEX_SYMBOL, ctx);
        compute_market_call(&bundle, &articles, ctx)
    }

    /// Stored market calls, newest first, capped at the history limit
    pub async fn market_call_history(&self) -> Vec<MarketCallResult> {
        let mut calls = self
            .attempt("market_calls", |s| s.market_calls())
            .await
            .unwrap_or_default();
        calls.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        calls.truncate(config::MARKET_CALL_HISTORY_LIMIT);
        calls
    }

    // -----------------------------------------------
    // DAILY PICKS
    // -----------------------------------------------

    pub async fn daily_picks(&self, ctx: &SynthesisContext) -> Vec<DailyPick> {
        match self.attempt("latest_daily_picks", |s| s.latest_daily_picks()).await {
            Some(picks) => picks,
            None => select_daily_picks(ctx),
        }
    }
}
