use crate::config;
use crate::insights::news::{filter_by_tab, NewsTab};
use crate::insights::{InsightService, InsightSource, SynthesisContext};
use crate::models::{DailyPick, MarketCallResult, NewsItem, PredictionBundle};
use crate::remote_client::RemoteClient;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

// -----------------------------------------------
// API REQUEST/RESPONSE MODELS
// -----------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub symbol: Option<String>,
    pub tab: Option<NewsTab>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub processing_time_ms: Option<u64>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, start_time: Instant) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            processing_time_ms: Some(start_time.elapsed().as_millis() as u64),
        }
    }

    fn failed(error: impl Into<String>, start_time: Instant) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            processing_time_ms: Some(start_time.elapsed().as_millis() as u64),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewsFeedResponse {
    pub tab: NewsTab,
    pub tab_label: &'static str,
    pub articles: Vec<NewsItem>,
}

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

#[derive(Clone)]
pub struct AppState {
    service: Arc<InsightService>,
    cache: Arc<RwLock<Cache>>,
    pinned_date: Option<NaiveDate>,
}

/// Entries are stamped with the calendar date they were computed for
#[derive(Default)]
struct Cache {
    market_call: Option<(NaiveDate, MarketCallResult, Instant)>,
    daily_picks: Option<(NaiveDate, Vec<DailyPick>, Instant)>,
    predictions: HashMap<String, (NaiveDate, PredictionBundle, Instant)>,
}

fn is_fresh(date: NaiveDate, cached_at: Instant, today: NaiveDate, window: Duration) -> bool {
    date == today && cached_at.elapsed() < window
}

impl Cache {
    /// Insert a prediction after dropping stale entries, evicting the oldest while full
    fn insert_prediction(&mut self, symbol: String, today: NaiveDate, bundle: PredictionBundle) {
        self.predictions.remove(&symbol);
        self.predictions.retain(|_, (date, _, cached_at)| {
            is_fresh(*date, *cached_at, today, config::PREDICTION_CACHE)
        });

        while self.predictions.len() >= config::PREDICTION_CACHE_MAX_ENTRIES {
            let oldest = self
                .predictions
                .iter()
                .min_by_key(|(_, (_, _, cached_at))| *cached_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.predictions.remove(&key);
                }
                None => break,
            }
        }

        self.predictions.insert(symbol, (today, bundle, Instant::now()));
    }
}

impl AppState {
    pub fn new(service: InsightService, pinned_date: Option<NaiveDate>) -> Self {
        Self {
            service: Arc::new(service),
            cache: Arc::new(RwLock::new(Cache::default())),
            pinned_date,
        }
    }

    /// State wired from the environment: remote backend if configured, pinned date if set
    pub fn from_env() -> Result<Self> {
        let source = RemoteClient::from_env()?;
        if let Some(client) = &source {
            tracing::info!(backend = client.base_url(), "remote insights backend configured");
        } else {
            tracing::info!("no remote backend configured, serving local insights only");
        }

        let service = InsightService::new(source.map(|c| Arc::new(c) as Arc<dyn InsightSource>));
        Ok(Self::new(service, config::get_pinned_date()))
    }

    fn context(&self) -> SynthesisContext {
        match self.pinned_date {
            Some(date) => SynthesisContext::for_date(date),
            None => SynthesisContext::now(),
        }
    }
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// GET /health - Health check endpoint
async fn health() -> &'static str {
    "OK"
}

/// GET /api/prediction?symbol=RELIANCE - Latest prediction for a symbol
async fn get_prediction(
    Query(query): Query<SymbolQuery>,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<PredictionBundle>>, StatusCode> {
    let start_time = Instant::now();
    let symbol = config::normalize_symbol(&query.symbol);
    if symbol.is_empty() {
        return Ok(Json(ApiResponse::failed("symbol is required", start_time)));
    }

    let ctx = app_state.context();

    // Check cache first
    {
        let cache = app_state.cache.read().await;
        if let Some((date, bundle, cached_at)) = cache.predictions.get(&symbol) {
            if is_fresh(*date, *cached_at, ctx.date, config::PREDICTION_CACHE) {
                return Ok(Json(ApiResponse::ok(bundle.clone(), start_time)));
            }
        }
    }

    let bundle = app_state.service.stock_prediction(&symbol, &ctx).await;

    // Update cache
    {
        let mut cache = app_state.cache.write().await;
        cache.insert_prediction(symbol, ctx.date, bundle.clone());
    }

    Ok(Json(ApiResponse::ok(bundle, start_time)))
}

/// GET /api/predictions/history?symbol=RELIANCE - Stored predictions, newest first
async fn get_prediction_history(
    Query(query): Query<SymbolQuery>,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PredictionBundle>>>, StatusCode> {
    let start_time = Instant::now();
    let symbol = config::normalize_symbol(&query.symbol);
    if symbol.is_empty() {
        return Ok(Json(ApiResponse::failed("symbol is required", start_time)));
    }

    let history = app_state.service.historical_predictions(&symbol).await;
    Ok(Json(ApiResponse::ok(history, start_time)))
}

/// GET /api/news?symbol=TCS&tab=regulatory - News feed, optionally filtered by tab
async fn get_news(
    Query(query): Query<NewsQuery>,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<NewsFeedResponse>>, StatusCode> {
    let start_time = Instant::now();
    let symbol = query
        .symbol
        .as_deref()
        .map(config::normalize_symbol)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config::MARKET_INDEX_SYMBOL.to_string());
    let tab = query.tab.unwrap_or_default();

    let ctx = app_state.context();
    let articles = app_state.service.news_feed(&symbol, &ctx).await;

    Ok(Json(ApiResponse::ok(
        NewsFeedResponse {
            tab,
            tab_label: tab.label(),
            articles: filter_by_tab(&articles, tab),
        },
        start_time,
    )))
}

/// GET /api/market-call - Today's market call for the index
async fn get_market_call(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<MarketCallResult>>, StatusCode> {
    let start_time = Instant::now();
    let ctx = app_state.context();

    {
        let cache = app_state.cache.read().await;
        if let Some((date, call, cached_at)) = &cache.market_call {
            if is_fresh(*date, *cached_at, ctx.date, config::MARKET_CALL_CACHE) {
                return Ok(Json(ApiResponse::ok(call.clone(), start_time)));
            }
        }
    }

    let call = app_state.service.todays_market_call(&ctx);

    {
        let mut cache = app_state.cache.write().await;
        cache.market_call = Some((ctx.date, call.clone(), Instant::now()));
    }

    Ok(Json(ApiResponse::ok(call, start_time)))
}

/// GET /api/market-calls/history - Stored market calls, newest first
async fn get_market_call_history(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MarketCallResult>>>, StatusCode> {
    let start_time = Instant::now();
    let calls = app_state.service.market_call_history().await;
    Ok(Json(ApiResponse::ok(calls, start_time)))
}

/// GET /api/daily-picks - Today's four options picks
async fn get_daily_picks(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DailyPick>>>, StatusCode> {
    let start_time = Instant::now();
    let ctx = app_state.context();

    {
        let cache = app_state.cache.read().await;
        if let Some((date, picks, cached_at)) = &cache.daily_picks {
            if is_fresh(*date, *cached_at, ctx.date, config::DAILY_PICKS_CACHE) {
                return Ok(Json(ApiResponse::ok(picks.clone(), start_time)));
            }
        }
    }

    let picks = app_state.service.daily_picks(&ctx).await;

    {
        let mut cache = app_state.cache.write().await;
        cache.daily_picks = Some((ctx.date, picks.clone(), Instant::now()));
    }

    Ok(Json(ApiResponse::ok(picks, start_time)))
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/prediction", get(get_prediction))
        .route("/api/predictions/history", get(get_prediction_history))
        .route("/api/news", get(get_news))
        .route("/api/market-call", get(get_market_call))
        .route("/api/market-calls/history", get(get_market_call_history))
        .route("/api/daily-picks", get(get_daily_picks))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn start_server(port: u16) -> Result<()> {
    let app = build_router(AppState::from_env()?);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "insights API server listening");
    println!("🚀 NSE Insights API running on http://{}", addr);
    println!("📋 Available endpoints:");
    println!("   GET  /health");
    println!("   GET  /api/prediction?symbol=RELIANCE");
    println!("   GET  /api/predictions/history?symbol=RELIANCE");
    println!("   GET  /api/news?symbol=RELIANCE&tab=regulatory");
    println!("   GET  /api/market-call");
    println!("   GET  /api/market-calls/history");
    println!("   GET  /api/daily-picks");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::synthesize_prediction;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn pinned() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 17).unwrap()
    }

    #[tokio::test]
    async fn test_prediction_cache_stays_bounded() {
        let state = AppState::new(InsightService::local_only(), Some(pinned()));
        let app = build_router(state.clone());

        let requests = config::PREDICTION_CACHE_MAX_ENTRIES + 200;
        for i in 0..requests {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri(format!("/api/prediction?symbol=JUNK{}", i))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let cache = state.cache.read().await;
        assert_eq!(cache.predictions.len(), config::PREDICTION_CACHE_MAX_ENTRIES);
        // the most recent symbol survives eviction
        assert!(cache.predictions.contains_key(&format!("JUNK{}", requests - 1)));
    }

    #[test]
    fn test_insert_prediction_drops_previous_days() {
        let today = pinned();
        let yesterday = today.pred_opt().unwrap();
        let mut cache = Cache::default();

        for symbol in ["TCS", "INFY", "WIPRO"] {
            let ctx = SynthesisContext::for_date(yesterday);
            cache
                .predictions
                .insert(symbol.to_string(), (yesterday, synthesize_prediction(symbol, &ctx), Instant::now()));
        }

        let ctx = SynthesisContext::for_date(today);
        cache.insert_prediction("RELIANCE".to_string(), today, synthesize_prediction("RELIANCE", &ctx));

        assert_eq!(cache.predictions.len(), 1);
        assert!(cache.predictions.contains_key("RELIANCE"));
    }

    #[test]
    fn test_insert_prediction_replaces_same_symbol() {
        let today = pinned();
        let ctx = SynthesisContext::for_date(today);
        let mut cache = Cache::default();

        cache.insert_prediction("TCS".to_string(), today, synthesize_prediction("TCS", &ctx));
        cache.insert_prediction("TCS".to_string(), today, synthesize_prediction("TCS", &ctx));
        assert_eq!(cache.predictions.len(), 1);
    }
}
