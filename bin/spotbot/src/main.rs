use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{Config, SpotExchange, TradingMode};
use engine::{BinanceClient, CycleRunner};
use strategy::StrategyParams;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };
    info!(mode = %cfg.trading_mode, symbol = %cfg.symbol(), "SpotBot starting");

    // ── Strategy parameters ───────────────────────────────────────────────────
    let params = match StrategyParams::load(&cfg.strategy_config_path) {
        Ok(params) => params,
        Err(e) => {
            error!(error = %e, path = %cfg.strategy_config_path, "strategy config error");
            std::process::exit(1);
        }
    };
    info!(strategy = %params.name, interval = %cfg.candle_interval, "strategy loaded");

    // ── Exchange client (endpoint chosen by TRADING_MODE) ─────────────────────
    match cfg.trading_mode {
        TradingMode::Live => info!("live trading mode, using production endpoints"),
        TradingMode::Sandbox => info!("sandbox mode, using testnet endpoints"),
    }
    let exchange: Arc<dyn SpotExchange> = Arc::new(BinanceClient::new(
        &cfg.api_key,
        &cfg.api_secret,
        cfg.trading_mode,
    ));

    // ── Trading loop ──────────────────────────────────────────────────────────
    CycleRunner::new(exchange, params, &cfg).run().await;
}
