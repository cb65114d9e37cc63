use super::predictor::{average_score, confidence_from_composite, flow_label};
use super::seed::SynthesisContext;
use crate::models::{MarketCallResult, MarketCallType, NewsCategory, NewsItem, PredictionBundle};

const NEWS_WEIGHT: f64 = 0.30;
const FLOW_WEIGHT: f64 = 0.30;
const CHART_WEIGHT: f64 = 0.25;
const REGULATORY_WEIGHT: f64 = 0.15;

pub const BULLISH_THRESHOLD: f64 = 55.0;
pub const BEARISH_THRESHOLD: f64 = 40.0;

/// Neutral midpoint used whenever a sub-score has no input
const NEUTRAL_SCORE: f64 = 50.0;

/// The four normalized inputs of a market call, each in 0..=100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub news_sentiment: f64,
    pub fii_dii: f64,
    pub chart_pattern: f64,
    pub regulatory: f64,
}

impl SubScores {
    pub fn from_inputs(bundle: &PredictionBundle, articles: &[NewsItem]) -> Self {
        Self {
            news_sentiment: sentiment_average(articles.iter()),
            fii_dii: fii_dii_score(bundle.fii_net(), bundle.dii_net()),
            chart_pattern: average_score(&bundle.technical_indicators).unwrap_or(NEUTRAL_SCORE),
            regulatory: sentiment_average(
                articles.iter().filter(|a| a.category == NewsCategory::Regulatory),
            ),
        }
    }

    pub fn composite(&self) -> f64 {
        self.news_sentiment * NEWS_WEIGHT
            + self.fii_dii * FLOW_WEIGHT
            + self.chart_pattern * CHART_WEIGHT
            + self.regulatory * REGULATORY_WEIGHT
    }
}

fn sentiment_average<'a>(articles: impl Iterator<Item = &'a NewsItem>) -> f64 {
    let (sum, count) = articles.fold((0.0, 0usize), |(sum, count), a| (sum + a.sentiment.score(), count + 1));
    if count == 0 { NEUTRAL_SCORE } else { sum / count as f64 }
}

/// Net flow relative to the larger leg (floored at 500), centred on 50
pub fn fii_dii_score(fii_net: f64, dii_net: f64) -> f64 {
    let max_flow = fii_net.abs().max(dii_net.abs()).max(500.0);
    (((fii_net + dii_net) / (2.0 * max_flow) + 0.5) * 100.0).clamp(0.0, 100.0)
}

/// Strict thresholds: exactly 55 or 40 stays moderate
pub fn classify_market_call(composite: f64) -> MarketCallType {
    if composite > BULLISH_THRESHOLD {
        MarketCallType::Bullish
    } else if composite < BEARISH_THRESHOLD {
        MarketCallType::Bearish
    } else {
        MarketCallType::Moderate
    }
}

/// Combine a prediction bundle and a news list into the day's market call
pub fn compute_market_call(
    bundle: &PredictionBundle,
    articles: &[NewsItem],
    ctx: &SynthesisContext,
) -> MarketCallResult {
    let scores = SubScores::from_inputs(bundle, articles);
    let net_flow = bundle.fii_net() + bundle.dii_net();
    market_call_from_scores(&scores, net_flow, bundle.fii_net(), bundle.dii_net(), ctx)
}

/// Classification and rationale for precomputed sub-scores
pub fn market_call_from_scores(
    scores: &SubScores,
    net_flow: f64,
    fii_net: f64,
    dii_net: f64,
    ctx: &SynthesisContext,
) -> MarketCallResult {
    let composite = scores.composite();
    let call = classify_market_call(composite);
    let confidence = confidence_from_composite(composite);

    let rationale = format!(
        "News sentiment is {} ({:.0}/100). \
         Institutional flows show {} (FII: ₹{:.0}Cr, DII: ₹{:.0}Cr). \
         Chart patterns indicate {} ({:.0}/100). \
         Regulatory environment is {} ({:.0}/100). \
         Composite score: {:.1} → {:?} call with {:.0}% confidence.",
        banded(scores.news_sentiment, "positive", "negative", "mixed"),
        scores.news_sentiment,
        flow_label(net_flow),
        fii_net,
        dii_net,
        banded(scores.chart_pattern, "bullish patterns", "bearish patterns", "neutral patterns"),
        scores.chart_pattern,
        banded(scores.regulatory, "supportive", "restrictive", "neutral"),
        scores.regulatory,
        composite,
        call,
        confidence,
    );

    MarketCallResult {
        call,
        confidence,
        news_sentiment_score: scores.news_sentiment,
        fii_dii_score: scores.fii_dii,
        chart_pattern_score: scores.chart_pattern,
        regulatory_score: scores.regulatory,
        rationale,
        generated_at: ctx.generated_at,
    }
}

/// Qualitative label: above 60 high, below 40 low, otherwise mid
fn banded(score: f64, high: &'static str, low: &'static str, mid: &'static str) -> &'static str {
    if score > 60.0 {
        high
    } else if score < 40.0 {
        low
    } else {
        mid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_market_call_boundaries() {
        assert_eq!(classify_market_call(55.0), MarketCallType::Moderate);
        assert_eq!(classify_market_call(55.01), MarketCallType::Bullish);
        assert_eq!(classify_market_call(40.0), MarketCallType::Moderate);
        assert_eq!(classify_market_call(39.99), MarketCallType::Bearish);
    }

    #[test]
    fn test_fii_dii_score() {
        assert_eq!(fii_dii_score(0.0, 0.0), 50.0);
        // both legs equal: total / (2*max) = 1 -> 150 clamped
        assert_eq!(fii_dii_score(1000.0, 1000.0), 100.0);
        assert_eq!(fii_dii_score(-1000.0, -1000.0), 0.0);
        // floor of 500 applies for small flows
        assert!((fii_dii_score(100.0, 0.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_banded_labels() {
        assert_eq!(banded(61.0, "a", "b", "c"), "a");
        assert_eq!(banded(60.0, "a", "b", "c"), "c");
        assert_eq!(banded(39.0, "a", "b", "c"), "b");
    }
}
