pub mod api_server_axum;
pub mod commands;
pub mod config;
pub mod error;
pub mod insights;
pub mod logging;
pub mod models;
pub mod remote_client;

// Re-exports for convenience
pub use error::RemoteError;
pub use insights::{InsightService, InsightSource, SynthesisContext};
pub use models::{DailyPick, MarketCallResult, NewsItem, PredictionBundle};
pub use remote_client::RemoteClient;
