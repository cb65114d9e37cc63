//! Seeded sequence generator.
//!
//! Every draw is a pure function of `(seed, offset)`:
//! `fract(sin(seed + offset) * 10000)`. Callers never pass raw offsets;
//! they go through a [`Channel`] so two logical quantities cannot share one.

/// A named purpose for a draw, mapped to a fixed offset
pub trait Channel: Copy {
    fn offset(self) -> i64;
}

/// Raw draw in [0, 1)
///
/// Panics if the intermediate value is not finite. That can only happen for
/// seeds far outside anything derived from a symbol and a calendar date.
pub fn draw(seed: i64, offset: i64) -> f64 {
    let x = ((seed + offset) as f64).sin() * 10000.0;
    assert!(x.is_finite(), "non-finite draw for seed {} offset {}", seed, offset);

    let value = x - x.floor();
    // fract of a value just below an integer can round up to exactly 1.0
    if value >= 1.0 { 0.0 } else { value }
}

/// Deterministic stream bound to one seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededStream {
    seed: i64,
}

impl SeededStream {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    /// Draw in [0, 1) for a channel
    pub fn unit<C: Channel>(&self, channel: C) -> f64 {
        draw(self.seed, channel.offset())
    }

    /// Draw scaled into [min, min + span)
    pub fn scaled<C: Channel>(&self, channel: C, min: f64, span: f64) -> f64 {
        self.unit(channel) * span + min
    }

    /// Draw an index in [0, len)
    pub fn index<C: Channel>(&self, channel: C, len: usize) -> usize {
        ((self.unit(channel) * len as f64).floor() as usize).min(len.saturating_sub(1))
    }

    /// Pick one element of a non-empty slice
    pub fn pick<C: Channel, T: Copy>(&self, channel: C, options: &[T]) -> T {
        options[self.index(channel, options.len())]
    }
}

// -----------------------------------------------
// DRAW CHANNELS
// -----------------------------------------------

/// Draws keyed by the per-symbol seed (prediction bundle and news sampling)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolChannel {
    Indicator(u8),
    NewsSentiment,
    FiiBuying,
    FiiSelling,
    DiiBuying,
    DiiSelling,
    TargetRange,
    RiskImpact(u8),
    ArticleSentiment(u8),
    ArticleCount,
    ArticleOrder(u8),
}

impl Channel for SymbolChannel {
    fn offset(self) -> i64 {
        match self {
            SymbolChannel::Indicator(i) => 10 + i as i64,
            SymbolChannel::NewsSentiment => 20,
            SymbolChannel::FiiBuying => 30,
            SymbolChannel::FiiSelling => 31,
            SymbolChannel::DiiBuying => 32,
            SymbolChannel::DiiSelling => 33,
            SymbolChannel::TargetRange => 40,
            SymbolChannel::RiskImpact(i) => 50 + i as i64,
            SymbolChannel::ArticleSentiment(i) => 100 + i as i64,
            SymbolChannel::ArticleCount => 200,
            SymbolChannel::ArticleOrder(i) => 300 + i as i64,
        }
    }
}

/// Factor signal drawn for one daily pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickFactor {
    PriceVariance,
    NewsSentiment,
    FiiFlow,
    GlobalCues,
    WorldMarketTrend,
    RegulatorySignal,
    SectorDirection,
}

/// Draws keyed by the date-only seed of the daily picks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickChannel {
    FirstBullish,
    SecondBullish,
    FirstBearish,
    SecondBearish,
    /// `slot` is the pick's position (0..4) in the output list
    Factor { slot: u8, factor: PickFactor },
}

impl Channel for PickChannel {
    fn offset(self) -> i64 {
        match self {
            PickChannel::FirstBullish => 1,
            PickChannel::SecondBullish => 2,
            PickChannel::FirstBearish => 3,
            PickChannel::SecondBearish => 4,
            PickChannel::Factor { slot, factor } => {
                let base = 10 * (slot as i64 + 1);
                base + match factor {
                    PickFactor::PriceVariance => 0,
                    PickFactor::NewsSentiment => 1,
                    PickFactor::FiiFlow => 2,
                    PickFactor::GlobalCues => 3,
                    PickFactor::WorldMarketTrend => 4,
                    PickFactor::RegulatorySignal => 5,
                    PickFactor::SectorDirection => 6,
                }
            }
        }
    }
}
