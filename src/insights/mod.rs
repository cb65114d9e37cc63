pub mod daily_picks;
pub mod market_call;
pub mod news;
pub mod predictor;
pub mod seed;
pub mod sequence;
pub mod service;

// Re-exports (public API)
pub use daily_picks::{monthly_expiry, nearest_strike, select_daily_picks, strike_step, PoolStock};
pub use market_call::{classify_market_call, compute_market_call, fii_dii_score, SubScores};
pub use news::{filter_by_tab, sample_news, NewsTab};
pub use predictor::{classify_direction, confidence_from_composite, synthesize_prediction};
pub use seed::{date_seed, derive_seed, symbol_code_sum, SynthesisContext};
pub use sequence::{draw, Channel, PickChannel, SeededStream, SymbolChannel};
pub use service::{InsightService, InsightSource};
