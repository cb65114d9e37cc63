use super::seed::{date_seed, SynthesisContext};
use super::sequence::{PickChannel, PickFactor, SeededStream};
use crate::models::{DailyPick, Direction, FlowSignal, OptionType, Sentiment, TradeAction, Trend};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Large-cap pool entry with its reference price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStock {
    pub symbol: &'static str,
    pub base_price: f64,
}

const fn stock(symbol: &'static str, base_price: f64) -> PoolStock {
    PoolStock { symbol, base_price }
}

pub const BULLISH_POOL: [PoolStock; 8] = [
    stock("TCS", 3500.0),
    stock("RELIANCE", 2550.0),
    stock("HDFCBANK", 1700.0),
    stock("ICICIBANK", 1100.0),
    stock("WIPRO", 480.0),
    stock("BAJFINANCE", 7200.0),
    stock("MARUTI", 12000.0),
    stock("SUNPHARMA", 1650.0),
];

pub const BEARISH_POOL: [PoolStock; 8] = [
    stock("INFY", 1600.0),
    stock("HDFC", 2600.0),
    stock("TATASTEEL", 160.0),
    stock("ONGC", 270.0),
    stock("COALINDIA", 450.0),
    stock("NTPC", 360.0),
    stock("POWERGRID", 310.0),
    stock("HINDALCO", 680.0),
];

/// NSE expiry string format, e.g. "30-Oct-2025"
pub const EXPIRY_FORMAT: &str = "%d-%b-%Y";

const FLOW_OPTIONS: [FlowSignal; 3] = [FlowSignal::Buy, FlowSignal::Sell, FlowSignal::Neutral];
const SENTIMENT_OPTIONS: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];
const DIRECTION_OPTIONS: [Direction; 3] = [Direction::Bullish, Direction::Bearish, Direction::Neutral];

// -----------------------------------------------
// SELECTION
// -----------------------------------------------

/// Two distinct pool indices from two draws; a collision advances the second by one
pub fn pick_two_indices(
    stream: &SeededStream,
    first: PickChannel,
    second: PickChannel,
    pool_size: usize,
) -> (usize, usize) {
    let a = stream.index(first, pool_size);
    let mut b = stream.index(second, pool_size);
    if b == a {
        b = (b + 1) % pool_size;
    }
    (a, b)
}

/// Four picks for the context's date: two bullish, then two bearish.
/// The second bearish pick carries the sector override.
pub fn select_daily_picks(ctx: &SynthesisContext) -> Vec<DailyPick> {
    let stream = SeededStream::new(date_seed(ctx.date));
    let expiry = monthly_expiry(ctx.date).format(EXPIRY_FORMAT).to_string();

    let (b1, b2) = pick_two_indices(
        &stream,
        PickChannel::FirstBullish,
        PickChannel::SecondBullish,
        BULLISH_POOL.len(),
    );
    let (r1, r2) = pick_two_indices(
        &stream,
        PickChannel::FirstBearish,
        PickChannel::SecondBearish,
        BEARISH_POOL.len(),
    );

    let slots = [
        (BULLISH_POOL[b1], Trend::Bullish, false),
        (BULLISH_POOL[b2], Trend::Bullish, false),
        (BEARISH_POOL[r1], Trend::Bearish, false),
        (BEARISH_POOL[r2], Trend::Bearish, true),
    ];

    let picks: Vec<DailyPick> = slots
        .iter()
        .enumerate()
        .map(|(slot, (stock, trend, force_override))| {
            make_pick(&stream, slot as u8, stock, *trend, *force_override, &expiry, ctx)
        })
        .collect();

    tracing::debug!(
        date = %ctx.date,
        symbols = ?picks.iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>(),
        "selected daily picks"
    );

    picks
}

fn make_pick(
    stream: &SeededStream,
    slot: u8,
    stock: &PoolStock,
    trend: Trend,
    force_override: bool,
    expiry: &str,
    ctx: &SynthesisContext,
) -> DailyPick {
    let channel = |factor: PickFactor| PickChannel::Factor { slot, factor };

    let variance_price = stock.base_price * (0.97 + stream.unit(channel(PickFactor::PriceVariance)) * 0.06);
    let is_bullish = trend == Trend::Bullish;

    // Sector direction: a forced override always opposes the pick's own trend
    let sector_direction = if force_override {
        if is_bullish { Direction::Bearish } else { Direction::Bullish }
    } else {
        stream.pick(channel(PickFactor::SectorDirection), &DIRECTION_OPTIONS)
    };

    DailyPick {
        symbol: stock.symbol.to_string(),
        trend,
        recommended_option: if is_bullish { OptionType::CE } else { OptionType::PE },
        strike_price: nearest_strike(variance_price),
        expiry: expiry.to_string(),
        is_high_volume: true,
        call_action: if is_bullish { TradeAction::Buy } else { TradeAction::Sell },
        put_action: if is_bullish { TradeAction::Sell } else { TradeAction::Buy },
        news_sentiment: stream.unit(channel(PickFactor::NewsSentiment)) * 2.0 - 1.0,
        fii_flow: stream.pick(channel(PickFactor::FiiFlow), &FLOW_OPTIONS),
        global_cues: stream.pick(channel(PickFactor::GlobalCues), &SENTIMENT_OPTIONS),
        world_market_trend: stream.pick(channel(PickFactor::WorldMarketTrend), &DIRECTION_OPTIONS),
        regulatory_signal: stream.pick(channel(PickFactor::RegulatorySignal), &SENTIMENT_OPTIONS),
        sector_direction,
        sector_override_applied: force_override,
        timestamp: ctx.generated_at,
    }
}

// -----------------------------------------------
// STRIKE & EXPIRY
// -----------------------------------------------

/// Strike step: 100 above 2000, 50 above 500, else 10
pub fn strike_step(price: f64) -> f64 {
    if price > 2000.0 {
        100.0
    } else if price > 500.0 {
        50.0
    } else {
        10.0
    }
}

/// Round a price to the nearest listed strike
pub fn nearest_strike(price: f64) -> f64 {
    let step = strike_step(price);
    (price / step).round() * step
}

/// Last Thursday of the date's month
pub fn monthly_expiry(date: NaiveDate) -> NaiveDate {
    let mut day = last_day_of_month(date);
    while day.weekday() != Weekday::Thu {
        day -= Duration::days(1);
    }
    day
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // only fails past chrono's max year
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_strike_rounding() {
        assert_eq!(nearest_strike(2550.0), 2600.0);
        assert_eq!(nearest_strike(480.0), 480.0);
        assert_eq!(nearest_strike(650.0), 650.0);
        assert_eq!(nearest_strike(1712.0), 1700.0);
        assert_eq!(nearest_strike(164.0), 160.0);
    }

    #[test]
    fn test_strike_step_boundaries() {
        assert_eq!(strike_step(2000.0), 50.0);
        assert_eq!(strike_step(2000.01), 100.0);
        assert_eq!(strike_step(500.0), 10.0);
        assert_eq!(strike_step(500.01), 50.0);
    }

    #[test]
    fn test_monthly_expiry_known_months() {
        assert_eq!(monthly_expiry(date(2025, 10, 1)), date(2025, 10, 30));
        assert_eq!(monthly_expiry(date(2025, 12, 15)), date(2025, 12, 25));
        assert_eq!(monthly_expiry(date(2024, 2, 10)), date(2024, 2, 29));
        // month ending on a Thursday
        assert_eq!(monthly_expiry(date(2026, 4, 2)), date(2026, 4, 30));
    }

    #[test]
    fn test_expiry_format() {
        let s = monthly_expiry(date(2025, 10, 17)).format(EXPIRY_FORMAT).to_string();
        assert_eq!(s, "30-Oct-2025");
    }

    #[test]
    fn test_forced_override_opposes_trend() {
        let ctx = SynthesisContext::for_date(date(2025, 10, 17));
        let picks = select_daily_picks(&ctx);
        let forced: Vec<&DailyPick> = picks.iter().filter(|p| p.sector_override_applied).collect();
        assert_eq!(forced.len(), 1);
        assert_eq!(forced[0].trend, Trend::Bearish);
        assert_eq!(forced[0].sector_direction, Direction::Bullish);
        assert_eq!(forced[0].recommended_option, OptionType::PE);
        assert_eq!(forced[0].put_action, TradeAction::Buy);
    }
}
