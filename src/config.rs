use chrono::NaiveDate;
use std::time::Duration;

// -----------------------------------------------
// REMOTE BACKEND
// -----------------------------------------------
pub const ENV_BACKEND_URL: &str = "INSIGHTS_BACKEND_URL";

pub const PREDICTIONS_PATH: &str = "/api/predictions";
pub const NEWS_PATH: &str = "/api/news";
pub const MARKET_CALLS_PATH: &str = "/api/market-calls";
pub const DAILY_PICKS_PATH: &str = "/api/daily-picks";

pub fn predictions_url(base: &str, symbol: &str) -> String {
    format!(
        "{}{}/{}",
        base.trim_end_matches('/'),
        PREDICTIONS_PATH,
        urlencoding::encode(symbol)
    )
}

pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = concat!("nse-insights/", env!("CARGO_PKG_VERSION"));

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// Single attempt per remote query; on expiry the local engine answers
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(8);

// -----------------------------------------------
// ENGINE DEFAULTS
// -----------------------------------------------
/// Index the daily market call is computed for
pub const MARKET_INDEX_SYMBOL: &str = "NIFTY50";

pub const MARKET_CALL_HISTORY_LIMIT: usize = 30;

// -----------------------------------------------
// SERVER CACHE WINDOWS
// -----------------------------------------------
pub const MARKET_CALL_CACHE: Duration = Duration::from_secs(60 * 60); // 1 hour
pub const DAILY_PICKS_CACHE: Duration = Duration::from_secs(5 * 60); // 5 minutes
pub const PREDICTION_CACHE: Duration = Duration::from_secs(5 * 60);
/// Upper bound on cached per-symbol predictions
pub const PREDICTION_CACHE_MAX_ENTRIES: usize = 512;

pub const DEFAULT_PORT: u16 = 3001;

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Get the execution mode from environment or default to server
pub fn get_execution_mode() -> String {
    std::env::var("INSIGHTS_MODE").unwrap_or_else(|_| "server".to_string())
}

/// Symbol for single prediction mode, upper-cased
pub fn get_single_symbol() -> String {
    normalize_symbol(&std::env::var("INSIGHTS_SYMBOL").unwrap_or_else(|_| "RELIANCE".to_string()))
}

pub fn get_port() -> u16 {
    std::env::var("INSIGHTS_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Remote backend base URL, `None` when unset or blank
pub fn get_backend_url() -> Option<String> {
    std::env::var(ENV_BACKEND_URL)
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Pinned calendar date (`YYYY-MM-DD`) for reproducible runs
pub fn get_pinned_date() -> Option<NaiveDate> {
    let raw = std::env::var("INSIGHTS_DATE").ok()?;
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "ignoring invalid INSIGHTS_DATE");
            None
        }
    }
}

/// Trim and upper-case a user supplied symbol
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictions_url_encodes_symbol() {
        assert_eq!(
            predictions_url("http://localhost:4000/", "M&M"),
            "http://localhost:4000/api/predictions/M%26M"
        );
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("  reliance "), "RELIANCE");
    }
}
