use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use common::{CandleInterval, Config, Decision, Error, Result, SpotExchange};
use strategy::{IndicatorEngine, PositionTracker, SignalEvaluator, StrategyParams, MIN_CANDLES};

use crate::schedule;

/// Candles requested per cycle; indicators see this sliding window.
const CANDLE_WINDOW: usize = 100;

/// Pause after a failed cycle before rescheduling.
const FAILURE_PAUSE: Duration = Duration::from_secs(5);

/// Drives one decision cycle per candle close:
/// fetch balances → fetch candles → compute indicators → evaluate →
/// submit order. Every fetch/compute failure skips the cycle; nothing
/// here crashes the long-running process.
pub struct CycleRunner {
    exchange: Arc<dyn SpotExchange>,
    indicators: IndicatorEngine,
    evaluator: SignalEvaluator,
    position: PositionTracker,
    symbol: String,
    base_asset: String,
    quote_asset: String,
    interval: CandleInterval,
}

impl CycleRunner {
    pub fn new(exchange: Arc<dyn SpotExchange>, params: StrategyParams, cfg: &Config) -> Self {
        Self {
            exchange,
            indicators: IndicatorEngine::new(params.clone()),
            evaluator: SignalEvaluator::new(params, cfg.limits),
            position: PositionTracker::new(cfg.limits.limit_buys),
            symbol: cfg.symbol(),
            base_asset: cfg.base_asset.clone(),
            quote_asset: cfg.quote_asset.clone(),
            interval: cfg.candle_interval,
        }
    }

    pub fn position(&self) -> &PositionTracker {
        &self.position
    }

    /// Execute one full decision cycle and apply its outcome.
    ///
    /// The position counter is mutated only after the exchange accepts the
    /// order; a rejected order leaves it unchanged.
    pub async fn run_once(&mut self) -> Result<Decision> {
        let balances = self
            .exchange
            .free_balances(&self.quote_asset, &self.base_asset)
            .await?;

        let candles = self
            .exchange
            .recent_candles(&self.symbol, self.interval, CANDLE_WINDOW)
            .await?;
        if candles.len() < MIN_CANDLES {
            return Err(Error::InsufficientData(format!(
                "got {} candles, need {MIN_CANDLES}",
                candles.len()
            )));
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        let snapshot = self.indicators.compute(&closes, &volumes)?;

        let last_price = self.exchange.last_price(&self.symbol).await?;
        let decision = self
            .evaluator
            .evaluate(&snapshot, last_price, &balances, &self.position);

        // The sole audit trail: one structured line per evaluation.
        info!(
            symbol = %self.symbol,
            last_price,
            macd = snapshot.macd,
            signal = snapshot.signal,
            histogram = snapshot.histogram,
            rsi = snapshot.rsi,
            stoch_rsi = snapshot.stoch_rsi,
            volume = snapshot.volume,
            volume_ma = snapshot.volume_ma,
            price_ema = snapshot.price_ema,
            quote_free = balances.quote_free,
            base_free = balances.base_free,
            total_buys = self.position.total_buys(),
            decision = %decision,
            "cycle evaluated"
        );

        match decision {
            Decision::Buy { quantity } => {
                let receipt = self.exchange.market_buy(&self.symbol, quantity).await?;
                self.position.record_buy();
                info!(
                    order_id = %receipt.order_id,
                    quantity,
                    total_buys = self.position.total_buys(),
                    "buy executed"
                );
            }
            Decision::SellFull { quantity } => {
                let receipt = self.exchange.market_sell(&self.symbol, quantity).await?;
                self.position.record_full_exit();
                info!(order_id = %receipt.order_id, quantity, "full exit executed");
            }
            Decision::SellPartial { quantity } => {
                let receipt = self.exchange.market_sell(&self.symbol, quantity).await?;
                self.position.record_partial_exit();
                info!(
                    order_id = %receipt.order_id,
                    quantity,
                    total_buys = self.position.total_buys(),
                    "partial exit executed"
                );
            }
            Decision::Hold { .. } => {}
        }

        Ok(decision)
    }

    /// Run cycles at candle-close boundaries until an interrupt signal.
    ///
    /// The wait is aligned to the configured candle interval; an interrupt
    /// aborts the sleep promptly and never leaves a partially submitted
    /// order behind (orders are submitted synchronously within a cycle).
    pub async fn run(mut self) {
        info!(
            symbol = %self.symbol,
            interval = %self.interval,
            strategy = %self.indicators.params().name,
            "trading loop started"
        );

        loop {
            let wait = schedule::until_next_close(self.interval.duration());
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received, exiting");
                    return;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            if let Err(e) = self.run_once().await {
                warn!(error = %e, "cycle skipped");
                tokio::time::sleep(FAILURE_PAUSE).await;
            }
        }
    }
}
