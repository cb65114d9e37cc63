use anyhow::Result;
use nse_insights::commands::InsightCommands;
use nse_insights::{config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let mode = config::get_execution_mode();
    tracing::info!(mode = %mode, "starting nse-insights");

    match mode.as_str() {
        "server" => InsightCommands::run_server(config::get_port()).await?,
        "prediction" => InsightCommands::run_prediction(&config::get_single_symbol()).await?,
        "picks" => InsightCommands::run_picks().await?,
        "market-call" => InsightCommands::run_market_call().await?,
        _ => {
            eprintln!("Invalid mode '{}'. Use 'server', 'prediction', 'picks' or 'market-call'", mode);
            eprintln!("Set INSIGHTS_MODE environment variable to control execution mode");
            eprintln!("Examples:");
            eprintln!("  INSIGHTS_MODE=server INSIGHTS_PORT=3001 cargo run");
            eprintln!("  INSIGHTS_MODE=prediction INSIGHTS_SYMBOL=RELIANCE cargo run");
            eprintln!("  INSIGHTS_MODE=picks INSIGHTS_DATE=2025-10-17 cargo run");
            eprintln!("  INSIGHTS_MODE=market-call cargo run");
            eprintln!("Set INSIGHTS_BACKEND_URL to read stored insights before falling back to local synthesis");
            std::process::exit(1);
        }
    }

    Ok(())
}
