use tracing::warn;

use common::{Balances, Decision, HoldReason, TradeLimits};

use crate::params::{EntryRule, ExitRule, StrategyParams};
use crate::position::PositionTracker;
use crate::snapshot::IndicatorSnapshot;

/// Decides one of BUY / SELL_FULL / SELL_PARTIAL / HOLD from the current
/// snapshot, balances and position state.
///
/// Evaluation is pure: the tracker is read-only here and mutated by the
/// cycle runner only after the exchange accepts the order.
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    params: StrategyParams,
    limits: TradeLimits,
}

impl SignalEvaluator {
    pub fn new(params: StrategyParams, limits: TradeLimits) -> Self {
        Self { params, limits }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Strict first-match order: buy eligibility, then tiered sell
    /// eligibility, then hold.
    pub fn evaluate(
        &self,
        snap: &IndicatorSnapshot,
        last_price: f64,
        balances: &Balances,
        position: &PositionTracker,
    ) -> Decision {
        if self.entry_fires(snap, last_price)
            && position.can_buy()
            && balances.quote_free > self.limits.min_quote_reserve
        {
            let raw = self
                .limits
                .max_trade_amount
                .min(balances.quote_free / last_price);
            let quantity = round_dp(raw, 2);
            if quantity >= self.limits.min_order_amount {
                return Decision::Buy { quantity };
            }
            warn!(
                quantity,
                min_order = self.limits.min_order_amount,
                "buy signal fired but sized order is below the minimum"
            );
            return Decision::Hold {
                reason: HoldReason::BelowMinOrder,
            };
        }

        if balances.base_free > 0.0 {
            if snap.stoch_rsi > self.params.ideal_exit_stoch_rsi {
                return Decision::SellFull {
                    quantity: round_dp(balances.base_free, 4),
                };
            }
            if self.partial_exit_fires(snap, last_price) {
                return Decision::SellPartial {
                    quantity: round_dp(
                        balances.base_free * self.params.partial_exit_fraction,
                        4,
                    ),
                };
            }
        }

        Decision::Hold {
            reason: HoldReason::NoSignal,
        }
    }

    fn entry_fires(&self, snap: &IndicatorSnapshot, last_price: f64) -> bool {
        match self.params.entry {
            EntryRule::TrendMomentum {
                stoch_rsi_max,
                rsi_max,
                min_histogram_ratio,
            } => {
                let (Some(volume), Some(volume_ma), Some(price_ema)) =
                    (snap.volume, snap.volume_ma, snap.price_ema)
                else {
                    return false;
                };
                snap.macd > snap.signal
                    && snap.macd > 0.0
                    && snap.histogram > last_price * min_histogram_ratio
                    && snap.stoch_rsi < stoch_rsi_max
                    && snap.rsi < rsi_max
                    && volume > volume_ma
                    && last_price > price_ema
            }
            EntryRule::MeanReversion {
                rsi_max,
                stoch_rsi_max,
            } => snap.macd < 0.0 && snap.rsi < rsi_max && snap.stoch_rsi < stoch_rsi_max,
        }
    }

    fn partial_exit_fires(&self, snap: &IndicatorSnapshot, last_price: f64) -> bool {
        match self.params.exit {
            ExitRule::Overbought {
                stoch_rsi_above,
                rsi_above,
            } => {
                snap.stoch_rsi > stoch_rsi_above
                    || snap.rsi > rsi_above
                    || snap.macd < snap.signal
                    || snap.price_ema.is_some_and(|ema| last_price < ema)
            }
            ExitRule::MomentumFade {
                macd_above,
                rsi_above,
            } => snap.macd > macd_above && snap.rsi > rsi_above,
        }
    }
}

fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
