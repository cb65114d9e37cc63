use super::seed::{derive_seed, symbol_code_sum, SynthesisContext};
use super::sequence::{SeededStream, SymbolChannel};
use crate::models::{Direction, PredictionBundle, RiskFactor, TechnicalIndicator};

// -----------------------------------------------
// CONSTANTS
// -----------------------------------------------

pub const INDICATOR_NAMES: [&str; 6] = [
    "RSI (14)",
    "MACD Signal",
    "Bollinger Bands",
    "EMA 50/200 Cross",
    "Volume Momentum",
    "Stochastic Oscillator",
];

/// Risk description with its impact range as (min, span)
const RISK_TEMPLATES: [(&str, f64, f64); 4] = [
    ("Global macroeconomic headwinds and interest rate uncertainty", 0.3, 0.5),
    ("Sector-specific regulatory changes may affect earnings", 0.2, 0.4),
    ("FII outflow risk in case of emerging market sell-off", 0.2, 0.6),
    ("Earnings miss risk in upcoming quarterly results", 0.1, 0.5),
];

const TECHNICAL_WEIGHT: f64 = 0.45;
const SENTIMENT_WEIGHT: f64 = 0.30;
const INSTITUTIONAL_WEIGHT: f64 = 0.25;

pub const BULLISH_THRESHOLD: f64 = 58.0;
pub const BEARISH_THRESHOLD: f64 = 42.0;

// -----------------------------------------------
// SYNTHESIS
// -----------------------------------------------

/// Build the prediction bundle for `symbol` on the context's date
pub fn synthesize_prediction(symbol: &str, ctx: &SynthesisContext) -> PredictionBundle {
    let seed = derive_seed(symbol, ctx.date);
    synthesize_from_seed(symbol, seed, ctx)
}

/// Build the prediction bundle from an explicit seed
pub fn synthesize_from_seed(symbol: &str, seed: i64, ctx: &SynthesisContext) -> PredictionBundle {
    let stream = SeededStream::new(seed);

    // Step 1: Technical indicators
    let technical_indicators: Vec<TechnicalIndicator> = INDICATOR_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| TechnicalIndicator {
            name: name.to_string(),
            score: stream.unit(SymbolChannel::Indicator(i as u8)) * 100.0,
        })
        .collect();
    let avg_technical = average_score(&technical_indicators).unwrap_or(50.0);

    // Step 2-3: Sentiment and institutional flow
    let news_sentiment = (stream.unit(SymbolChannel::NewsSentiment) * 2.0 - 1.0) * 100.0;
    let fii_buying = stream.scaled(SymbolChannel::FiiBuying, 500.0, 2000.0);
    let fii_selling = stream.scaled(SymbolChannel::FiiSelling, 300.0, 1500.0);
    let dii_buying = stream.scaled(SymbolChannel::DiiBuying, 400.0, 1800.0);
    let dii_selling = stream.scaled(SymbolChannel::DiiSelling, 200.0, 1200.0);

    let fii_net = fii_buying - fii_selling;
    let dii_net = dii_buying - dii_selling;

    // Step 4-7: Composite, direction, confidence
    let composite = composite_score(
        avg_technical,
        news_sentiment,
        institutional_score(fii_net, dii_net),
    );
    let direction = classify_direction(composite);
    let confidence = confidence_from_composite(composite);

    // Step 8: Price targets
    let base_price = base_price(symbol);
    let range_width = target_range_width(base_price, stream.unit(SymbolChannel::TargetRange));
    let (target_lower, target_upper) = place_target_range(base_price, range_width, direction);

    // Step 9: Risk factors
    let risk_factors = synthesize_risk_factors(&stream);

    // Step 10: Rationale
    let rationale = build_rationale(
        symbol,
        direction,
        confidence,
        &technical_indicators,
        news_sentiment,
        fii_net,
        dii_net,
        target_lower,
        target_upper,
    );

    PredictionBundle {
        symbol: symbol.to_string(),
        direction,
        target_lower,
        target_upper,
        confidence,
        technical_indicators,
        news_sentiment,
        fii_buying,
        fii_selling,
        dii_buying,
        dii_selling,
        risk_factors,
        rationale,
        timestamp: ctx.generated_at,
    }
}

// -----------------------------------------------
// SCORING HELPERS
// -----------------------------------------------

/// Mean indicator score, `None` when there are no indicators
pub fn average_score(indicators: &[TechnicalIndicator]) -> Option<f64> {
    if indicators.is_empty() {
        return None;
    }
    Some(indicators.iter().map(|t| t.score).sum::<f64>() / indicators.len() as f64)
}

/// Net institutional flow mapped onto 0..=100
pub fn institutional_score(fii_net: f64, dii_net: f64) -> f64 {
    (((fii_net + dii_net) / 2000.0 + 1.0) / 2.0 * 100.0).clamp(0.0, 100.0)
}

pub fn composite_score(avg_technical: f64, news_sentiment: f64, institutional: f64) -> f64 {
    avg_technical * TECHNICAL_WEIGHT
        + ((news_sentiment + 100.0) / 2.0) * SENTIMENT_WEIGHT
        + institutional * INSTITUTIONAL_WEIGHT
}

/// Strict thresholds: exactly 58 or 42 stays neutral
pub fn classify_direction(composite: f64) -> Direction {
    if composite > BULLISH_THRESHOLD {
        Direction::Bullish
    } else if composite < BEARISH_THRESHOLD {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}

/// Distance from 50 doubled, clamped to 45..=95
pub fn confidence_from_composite(composite: f64) -> f64 {
    ((composite - 50.0).abs() * 2.0 + 50.0).clamp(45.0, 95.0)
}

pub fn base_price(symbol: &str) -> f64 {
    500.0 + (symbol_code_sum(symbol) % 2000) as f64
}

/// 5% of base plus up to a further 8%
pub fn target_range_width(base_price: f64, unit_draw: f64) -> f64 {
    base_price * 0.05 + unit_draw * base_price * 0.08
}

/// Returns (lower, upper) with lower <= upper
pub fn place_target_range(base_price: f64, width: f64, direction: Direction) -> (f64, f64) {
    let (a, b) = match direction {
        Direction::Bullish => (base_price + width * 0.3, base_price + width),
        Direction::Bearish => (base_price - width, base_price - width * 0.3),
        Direction::Neutral => (base_price - width * 0.3, base_price + width * 0.3),
    };
    (a.min(b), a.max(b))
}

fn synthesize_risk_factors(stream: &SeededStream) -> Vec<RiskFactor> {
    let mut factors: Vec<RiskFactor> = RISK_TEMPLATES
        .iter()
        .enumerate()
        .map(|(i, (description, min, span))| RiskFactor {
            description: description.to_string(),
            impact_level: stream.scaled(SymbolChannel::RiskImpact(i as u8), *min, *span),
        })
        .collect();

    factors.sort_by(|a, b| b.impact_level.total_cmp(&a.impact_level));
    factors
}

pub fn sentiment_label(news_sentiment: f64) -> &'static str {
    if news_sentiment > 20.0 {
        "positive"
    } else if news_sentiment < -20.0 {
        "negative"
    } else {
        "neutral"
    }
}

pub fn flow_label(net_flow: f64) -> &'static str {
    if net_flow > 0.0 { "net buying" } else { "net selling" }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Bullish => "bullish",
        Direction::Bearish => "bearish",
        Direction::Neutral => "neutral",
    }
}

#[allow(clippy::too_many_arguments)]
fn build_rationale(
    symbol: &str,
    direction: Direction,
    confidence: f64,
    indicators: &[TechnicalIndicator],
    news_sentiment: f64,
    fii_net: f64,
    dii_net: f64,
    target_lower: f64,
    target_upper: f64,
) -> String {
    let direction = direction_label(direction);
    let (top_name, top_score) = indicators
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|t| (t.name.as_str(), t.score))
        .unwrap_or(("Composite", 50.0));

    format!(
        "{} shows a {} outlook with {:.0}% confidence. \
         Technical analysis led by {} (score: {:.1}) indicates {} momentum. \
         News sentiment is {} ({:.1}), and institutional investors show {} \
         (FII net: ₹{:.0}Cr, DII net: ₹{:.0}Cr). \
         Short-term price target range: ₹{:.0} – ₹{:.0}.",
        symbol,
        direction,
        confidence,
        top_name,
        top_score,
        direction,
        sentiment_label(news_sentiment),
        news_sentiment,
        flow_label(fii_net + dii_net),
        fii_net,
        dii_net,
        target_lower,
        target_upper,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> SynthesisContext {
        SynthesisContext::for_date(NaiveDate::from_ymd_opt(2025, 10, 17).unwrap())
    }

    #[test]
    fn test_classify_direction_boundaries() {
        assert_eq!(classify_direction(58.0), Direction::Neutral);
        assert_eq!(classify_direction(58.0001), Direction::Bullish);
        assert_eq!(classify_direction(42.0), Direction::Neutral);
        assert_eq!(classify_direction(41.9999), Direction::Bearish);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(confidence_from_composite(50.0), 50.0);
        assert_eq!(confidence_from_composite(52.0), 54.0);
        assert_eq!(confidence_from_composite(100.0), 95.0);
        assert_eq!(confidence_from_composite(0.0), 95.0);
    }

    #[test]
    fn test_institutional_score_clamped() {
        assert_eq!(institutional_score(0.0, 0.0), 50.0);
        assert_eq!(institutional_score(5000.0, 5000.0), 100.0);
        assert_eq!(institutional_score(-5000.0, -5000.0), 0.0);
    }

    #[test]
    fn test_target_range_placement() {
        let (lo, hi) = place_target_range(1000.0, 100.0, Direction::Bullish);
        assert_eq!((lo, hi), (1030.0, 1100.0));

        let (lo, hi) = place_target_range(1000.0, 100.0, Direction::Bearish);
        assert_eq!((lo, hi), (900.0, 970.0));

        let (lo, hi) = place_target_range(1000.0, 100.0, Direction::Neutral);
        assert_eq!((lo, hi), (970.0, 1030.0));
    }

    #[test]
    fn test_target_width_bounds() {
        assert_eq!(target_range_width(1000.0, 0.0), 50.0);
        assert!((target_range_width(1000.0, 0.999) - 129.92).abs() < 1e-9);
    }

    #[test]
    fn test_risk_factors_sorted_descending() {
        let bundle = synthesize_prediction("RELIANCE", &ctx());
        assert_eq!(bundle.risk_factors.len(), 4);
        for pair in bundle.risk_factors.windows(2) {
            assert!(pair[0].impact_level >= pair[1].impact_level);
        }
    }

    #[test]
    fn test_rationale_mentions_symbol_and_range() {
        let bundle = synthesize_prediction("TCS", &ctx());
        assert!(bundle.rationale.starts_with("TCS shows a"));
        assert!(bundle.rationale.contains(&format!("₹{:.0}", bundle.target_lower)));
        assert!(bundle.rationale.contains("Technical analysis led by"));
    }
}
