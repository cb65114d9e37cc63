use crate::api_server_axum;
use crate::config;
use crate::insights::{InsightService, InsightSource, SynthesisContext};
use crate::models::{DailyPick, Direction, MarketCallType, NewsItem, Sentiment, Trend};
use crate::remote_client::RemoteClient;

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

/// Command handler for the console modes
pub struct InsightCommands;

impl InsightCommands {
    fn service() -> Result<InsightService> {
        let source = RemoteClient::from_env()?;
        Ok(InsightService::new(source.map(|c| Arc::new(c) as Arc<dyn InsightSource>)))
    }

    fn context() -> SynthesisContext {
        match config::get_pinned_date() {
            Some(date) => SynthesisContext::for_date(date),
            None => SynthesisContext::now(),
        }
    }

    fn header(title: &str) {
        println!("{}", "=".repeat(60).blue());
        println!("{}", title.green().bold());
        println!("{}", "=".repeat(60).blue());
        println!();
    }

    /// Print the prediction bundle for one symbol
    pub async fn run_prediction(symbol: &str) -> Result<()> {
        Self::header("NSE Insights - Stock Prediction");

        let service = Self::service()?;
        let ctx = Self::context();

        println!("{} Symbol: {}", "→".cyan(), symbol.yellow());
        println!("{} Date: {}", "→".cyan(), ctx.date);
        println!();

        let bundle = service.stock_prediction(symbol, &ctx).await;

        let direction = match bundle.direction {
            Direction::Bullish => "BULLISH".green().bold(),
            Direction::Bearish => "BEARISH".red().bold(),
            Direction::Neutral => "NEUTRAL".yellow().bold(),
        };
        println!("{} Direction: {} ({:.0}% confidence)", "✓".green(), direction, bundle.confidence);
        println!(
            "{} Target: ₹{:.0} – ₹{:.0}",
            "✓".green(),
            bundle.target_lower,
            bundle.target_upper
        );
        println!("{} News sentiment: {:.1}", "ℹ".blue(), bundle.news_sentiment);
        println!(
            "{} FII net: ₹{:.0}Cr  DII net: ₹{:.0}Cr",
            "ℹ".blue(),
            bundle.fii_net(),
            bundle.dii_net()
        );
        println!();

        println!("{}", "Technical indicators:".cyan());
        for indicator in &bundle.technical_indicators {
            println!("  • {:<24} {:>6.1}", indicator.name, indicator.score);
        }
        println!();

        println!("{}", "Risk factors:".cyan());
        for risk in &bundle.risk_factors {
            println!("  • {:.0}%  {}", risk.impact_level * 100.0, risk.description);
        }
        println!();

        println!("{}", bundle.rationale);
        println!();

        let articles = service.news_feed(symbol, &ctx).await;
        println!("{}", "Headlines:".cyan());
        for article in &articles {
            println!("  • {}", Self::headline(article));
        }
        Ok(())
    }

    /// One-line headline: sentiment marker, title, source and category
    pub fn headline(article: &NewsItem) -> String {
        let marker = match article.sentiment {
            Sentiment::Positive => "▲",
            Sentiment::Negative => "▼",
            Sentiment::Neutral => "■",
        };
        format!(
            "{} {} [{} | {}]",
            marker,
            article.title,
            article.source.label(),
            article.category.label()
        )
    }

    /// Print today's four options picks
    pub async fn run_picks() -> Result<()> {
        Self::header("NSE Insights - Daily Options Picks");

        let service = Self::service()?;
        let ctx = Self::context();
        let picks = service.daily_picks(&ctx).await;

        for pick in &picks {
            Self::display_pick(pick);
        }

        println!();
        println!("{} {} picks for {}", "✓".green(), picks.len(), ctx.date);
        Ok(())
    }

    fn display_pick(pick: &DailyPick) {
        let trend = match pick.trend {
            Trend::Bullish => "bullish".green(),
            Trend::Bearish => "bearish".red(),
        };
        println!(
            "  {} {:<12} {:<8} {:?} {:>8.0}  exp {}  call:{:?} put:{:?}",
            "•".cyan(),
            pick.symbol.yellow(),
            trend,
            pick.recommended_option,
            pick.strike_price,
            pick.expiry,
            pick.call_action,
            pick.put_action,
        );
        if pick.sector_override_applied {
            println!(
                "    {} sector direction {:?} overrides the {:?} call",
                "⚠".yellow(),
                pick.sector_direction,
                pick.trend
            );
        }
    }

    /// Print today's market call for the index
    pub async fn run_market_call() -> Result<()> {
        Self::header("NSE Insights - Daily Market Call");

        let service = Self::service()?;
        let ctx = Self::context();
        let call = service.todays_market_call(&ctx);

        let label = match call.call {
            MarketCallType::Bullish => "Bullish".green().bold(),
            MarketCallType::Bearish => "Bearish".red().bold(),
            MarketCallType::Moderate => "Moderate".yellow().bold(),
        };
        println!("{} {} call with {:.0}% confidence", "✓".green(), label, call.confidence);
        println!("  • News sentiment: {:.0}", call.news_sentiment_score);
        println!("  • FII/DII flow:   {:.0}", call.fii_dii_score);
        println!("  • Chart patterns: {:.0}", call.chart_pattern_score);
        println!("  • Regulatory:     {:.0}", call.regulatory_score);
        println!();
        println!("{}", call.rationale);
        Ok(())
    }

    /// Run API server mode
    pub async fn run_server(port: u16) -> Result<()> {
        Self::header("NSE Insights API Server");
        api_server_axum::start_server(port).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewsCategory, NewsSource};

    fn article(source: NewsSource, category: NewsCategory, sentiment: Sentiment) -> NewsItem {
        NewsItem {
            title: "SEBI tightens F&O regulations".to_string(),
            source,
            category,
            sentiment,
            summary: String::new(),
            url: "https://livemint.com".to_string(),
            published_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_headline_shows_source_and_category() {
        let line = InsightCommands::headline(&article(
            NewsSource::Mint,
            NewsCategory::Regulatory,
            Sentiment::Negative,
        ));
        assert_eq!(line, "▼ SEBI tightens F&O regulations [Mint | Regulatory]");

        let line = InsightCommands::headline(&article(
            NewsSource::YahooFinance,
            NewsCategory::ImportExport,
            Sentiment::Positive,
        ));
        assert!(line.ends_with("[Yahoo Finance | Import/Export]"));
    }

    #[test]
    fn test_headline_with_other_source() {
        let named = article(
            NewsSource::Other("Moneycontrol".to_string()),
            NewsCategory::General,
            Sentiment::Neutral,
        );
        assert!(InsightCommands::headline(&named).ends_with("[Moneycontrol | General]"));

        let unnamed = article(NewsSource::Other(String::new()), NewsCategory::WorldMarkets, Sentiment::Neutral);
        assert!(InsightCommands::headline(&unnamed).ends_with("[Other | World Markets]"));
    }
}
