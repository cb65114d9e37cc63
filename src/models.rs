use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -----------------------------------------------
// CATEGORICAL SIGNALS
// -----------------------------------------------

/// Short-term price direction of a prediction bundle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Score used when averaging article sentiment (positive 70, negative 30, neutral 50)
    pub fn score(self) -> f64 {
        match self {
            Sentiment::Positive => 70.0,
            Sentiment::Negative => 30.0,
            Sentiment::Neutral => 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum NewsCategory {
    General,
    WorldMarkets,
    IndiaTradeDeals,
    Tariffs,
    ImportExport,
    Regulatory,
}

impl NewsCategory {
    pub fn label(self) -> &'static str {
        match self {
            NewsCategory::General => "General",
            NewsCategory::WorldMarkets => "World Markets",
            NewsCategory::IndiaTradeDeals => "India Trade Deals",
            NewsCategory::Tariffs => "Tariffs",
            NewsCategory::ImportExport => "Import/Export",
            NewsCategory::Regulatory => "Regulatory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NewsSource {
    EconomicTimes,
    Bloomberg,
    Mint,
    Reuters,
    Cnbc,
    Bbc,
    YahooFinance,
    Barrons,
    Fortune,
    MarketWatch,
    Other(String),
}

impl NewsSource {
    pub fn label(&self) -> &str {
        match self {
            NewsSource::EconomicTimes => "Economic Times",
            NewsSource::Bloomberg => "Bloomberg",
            NewsSource::Mint => "Mint",
            NewsSource::Reuters => "Reuters",
            NewsSource::Cnbc => "CNBC",
            NewsSource::Bbc => "BBC",
            NewsSource::YahooFinance => "Yahoo Finance",
            NewsSource::Barrons => "Barron's",
            NewsSource::Fortune => "Fortune",
            NewsSource::MarketWatch => "MarketWatch",
            NewsSource::Other(name) if name.is_empty() => "Other",
            NewsSource::Other(name) => name.as_str(),
        }
    }
}

/// Market-wide call. Tags are capitalised on the wire ("Bullish", "Bearish", "Moderate").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MarketCallType {
    Bullish,
    Bearish,
    Moderate,
}

/// Trend tag of a daily pick (never neutral)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OptionType {
    CE,
    PE,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// Institutional flow category for a pick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FlowSignal {
    Buy,
    Sell,
    Neutral,
}

// -----------------------------------------------
// PREDICTION BUNDLE
// -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicator {
    pub name: String,
    pub score: f64, // 0..=100
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub description: String,
    pub impact_level: f64, // 0..=1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionBundle {
    pub symbol: String,
    pub direction: Direction,
    pub target_lower: f64,
    pub target_upper: f64,
    pub confidence: f64,
    pub technical_indicators: Vec<TechnicalIndicator>,
    pub news_sentiment: f64,
    pub fii_buying: f64,
    pub fii_selling: f64,
    pub dii_buying: f64,
    pub dii_selling: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub rationale: String,
    pub timestamp: DateTime<Utc>,
}

impl PredictionBundle {
    pub fn fii_net(&self) -> f64 {
        self.fii_buying - self.fii_selling
    }

    pub fn dii_net(&self) -> f64 {
        self.dii_buying - self.dii_selling
    }
}

// -----------------------------------------------
// NEWS
// -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub source: NewsSource,
    pub category: NewsCategory,
    pub sentiment: Sentiment,
    pub summary: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

// -----------------------------------------------
// MARKET CALL
// -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketCallResult {
    pub call: MarketCallType,
    pub confidence: f64,
    pub news_sentiment_score: f64,
    pub fii_dii_score: f64,
    pub chart_pattern_score: f64,
    pub regulatory_score: f64,
    pub rationale: String,
    pub generated_at: DateTime<Utc>,
}

// -----------------------------------------------
// DAILY OPTIONS PICKS
// -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyPick {
    pub symbol: String,
    pub trend: Trend,
    pub recommended_option: OptionType,
    pub strike_price: f64,
    pub expiry: String, // "30-Oct-2025"
    pub is_high_volume: bool,
    pub call_action: TradeAction,
    pub put_action: TradeAction,

    // Auxiliary factor signals
    pub news_sentiment: f64, // -1..1
    pub fii_flow: FlowSignal,
    pub global_cues: Sentiment,
    pub world_market_trend: Direction,
    pub regulatory_signal: Sentiment,
    pub sector_direction: Direction,
    pub sector_override_applied: bool,

    pub timestamp: DateTime<Utc>,
}
