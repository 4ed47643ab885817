use std::sync::Arc;

use chrono::TimeZone;

use common::{Candle, Config, Decision, Error, TradeLimits, TradingMode};
use engine::CycleRunner;
use paper::PaperExchange;
use strategy::StrategyParams;

fn test_config(interval: &str) -> Config {
    Config {
        api_key: "test".into(),
        api_secret: "test".into(),
        trading_mode: TradingMode::Sandbox,
        base_asset: "SOL".into(),
        quote_asset: "USDT".into(),
        candle_interval: interval.parse().unwrap(),
        limits: TradeLimits::default(),
        strategy_config_path: String::new(),
    }
}

fn candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            open_time: chrono::Utc
                .timestamp_opt(1_700_000_000 + i as i64 * 3600, 0)
                .unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Rally then a heavy sell-off with small relief bounces: ends deeply
/// oversold (low RSI/StochRSI, negative MACD).
fn oversold_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..70).map(|i| 100.0 + i as f64).collect();
    let mut price = *closes.last().unwrap();
    let mut steps = Vec::new();
    for _ in 0..7 {
        steps.extend([0.5, -4.0, -4.0, -4.0]);
    }
    steps.extend([-4.0, -4.0]);
    for step in steps {
        price += step;
        closes.push(price);
    }
    closes
}

/// Sell-off then a strong sustained rally: ends deeply overbought.
fn overbought_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..70).map(|i| 200.0 - i as f64).collect();
    let mut price = *closes.last().unwrap();
    for _ in 0..30 {
        price += 2.0;
        closes.push(price);
    }
    closes
}

#[tokio::test]
async fn oversold_cycle_buys_and_increments_counter() {
    let exchange = Arc::new(PaperExchange::new(100.0, 0.0, 0.0));
    exchange.set_candles(candles(&oversold_closes())).await;

    let cfg = test_config("1h");
    let mut runner = CycleRunner::new(
        exchange.clone(),
        StrategyParams::mean_reversion_1h(),
        &cfg,
    );

    let decision = runner.run_once().await.unwrap();
    assert_eq!(decision, Decision::Buy { quantity: 0.5 });
    assert_eq!(runner.position().total_buys(), 1);

    let balances = exchange.balances().await;
    assert!((balances.base_free - 0.5).abs() < 1e-9);
    assert!(balances.quote_free < 100.0);
}

#[tokio::test]
async fn overbought_cycle_liquidates_the_base_balance() {
    let exchange = Arc::new(PaperExchange::new(5.0, 4.0, 0.0));
    exchange.set_candles(candles(&overbought_closes())).await;

    let cfg = test_config("1h");
    let mut runner = CycleRunner::new(
        exchange.clone(),
        StrategyParams::mean_reversion_1h(),
        &cfg,
    );

    let decision = runner.run_once().await.unwrap();
    assert_eq!(decision, Decision::SellFull { quantity: 4.0 });
    assert_eq!(runner.position().total_buys(), 0);

    let balances = exchange.balances().await;
    assert!(balances.base_free.abs() < 1e-9);
    assert!(balances.quote_free > 5.0);
}

#[tokio::test]
async fn short_history_skips_the_cycle() {
    let exchange = Arc::new(PaperExchange::new(100.0, 0.0, 0.0));
    exchange
        .set_candles(candles(&oversold_closes()[..40]))
        .await;

    let cfg = test_config("1h");
    let mut runner = CycleRunner::new(
        exchange.clone(),
        StrategyParams::mean_reversion_1h(),
        &cfg,
    );

    let err = runner.run_once().await.unwrap_err();
    assert!(matches!(err, Error::InsufficientData(_)));
    assert_eq!(runner.position().total_buys(), 0);

    // Nothing was traded.
    let balances = exchange.balances().await;
    assert!((balances.quote_free - 100.0).abs() < 1e-9);
    assert!(balances.base_free.abs() < 1e-9);
}

#[tokio::test]
async fn rejected_order_leaves_the_counter_untouched() {
    // Slippage makes the sized buy cost slightly more than the free quote
    // balance, so the paper exchange rejects the order.
    let exchange = Arc::new(PaperExchange::new(19.8, 0.0, 10.0));
    exchange.set_candles(candles(&oversold_closes())).await;

    let cfg = test_config("1h");
    let mut runner = CycleRunner::new(
        exchange.clone(),
        StrategyParams::mean_reversion_1h(),
        &cfg,
    );

    let err = runner.run_once().await.unwrap_err();
    assert!(matches!(err, Error::Order(_)));
    assert_eq!(runner.position().total_buys(), 0);
}

#[tokio::test]
async fn neutral_market_holds_without_touching_balances() {
    // Gentle oscillation around a flat mean: neither entry nor exit fires
    // for the mean-reversion variant when there is nothing to sell.
    let closes: Vec<f64> = (0..100)
        .map(|i| 100.0 + (i as f64 * 0.5).sin() * 1.0)
        .collect();
    let exchange = Arc::new(PaperExchange::new(100.0, 0.0, 0.0));
    exchange.set_candles(candles(&closes)).await;

    let cfg = test_config("1h");
    let mut runner = CycleRunner::new(
        exchange.clone(),
        StrategyParams::mean_reversion_1h(),
        &cfg,
    );

    let decision = runner.run_once().await.unwrap();
    assert!(matches!(decision, Decision::Hold { .. }));

    let balances = exchange.balances().await;
    assert!((balances.quote_free - 100.0).abs() < 1e-9);
}
