use common::{Error, Result};

use crate::indicators::{self, MacdIndicator, RsiIndicator, StochRsiIndicator};
use crate::params::StrategyParams;

/// Minimum candles required before any indicator is computed.
pub const MIN_CANDLES: usize = 50;

/// Latest value of every configured indicator, derived fresh each cycle.
/// Historical indicator values are discarded after use.
///
/// `volume`, `volume_ma` and `price_ema` are populated only when the
/// configured rules read them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// Wilder RSI, clamped into the configured bounds.
    pub rsi: f64,
    /// Stochastic RSI %K, clamped into the configured bounds.
    pub stoch_rsi: f64,
    pub volume: Option<f64>,
    pub volume_ma: Option<f64>,
    pub price_ema: Option<f64>,
}

/// Computes an `IndicatorSnapshot` from raw close/volume history.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    params: StrategyParams,
}

impl IndicatorEngine {
    pub fn new(params: StrategyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Compute the snapshot for the latest candle.
    ///
    /// `closes` and `volumes` are oldest-first and must be aligned.
    /// Fails with `InsufficientData` on short input or when an indicator
    /// produces no defined value; the caller treats that as "no decision
    /// this cycle".
    pub fn compute(&self, closes: &[f64], volumes: &[f64]) -> Result<IndicatorSnapshot> {
        if closes.len() < MIN_CANDLES {
            return Err(Error::InsufficientData(format!(
                "got {} candles, need {MIN_CANDLES}",
                closes.len()
            )));
        }
        if self.params.needs_volume() && volumes.len() != closes.len() {
            return Err(Error::InsufficientData(format!(
                "volume series length {} does not match {} closes",
                volumes.len(),
                closes.len()
            )));
        }

        let macd = MacdIndicator::new(
            self.params.macd.fast,
            self.params.macd.slow,
            self.params.macd.signal,
        )
        .compute(closes)
        .ok_or_else(|| Error::InsufficientData("MACD produced no defined value".into()))?;

        let rsi_raw = RsiIndicator::new(self.params.rsi_period)
            .latest(closes)
            .ok_or_else(|| Error::InsufficientData("RSI produced no defined value".into()))?;
        let rsi = self.params.rsi_clamp.apply(rsi_raw);

        let stoch_raw = StochRsiIndicator::new(
            self.params.stoch_rsi.rsi_period,
            self.params.stoch_rsi.stoch_period,
        )
        .latest(closes)
        .unwrap_or(self.params.stoch_rsi_default);
        let stoch_rsi = self.params.rsi_clamp.apply(stoch_raw);

        let (volume, volume_ma) = if self.params.needs_volume() {
            let ma = indicators::sma_latest(volumes, self.params.volume_ma_period).ok_or_else(
                || Error::InsufficientData("volume SMA produced no defined value".into()),
            )?;
            (volumes.last().copied(), Some(ma))
        } else {
            (None, None)
        };

        let price_ema = if self.params.needs_price_ema() {
            let ema = indicators::ema::latest(closes, self.params.price_ema_period).ok_or_else(
                || Error::InsufficientData("price EMA produced no defined value".into()),
            )?;
            Some(ema)
        } else {
            None
        };

        Ok(IndicatorSnapshot {
            macd: macd.macd,
            signal: macd.signal,
            histogram: macd.histogram,
            rsi,
            stoch_rsi,
            volume,
            volume_ma,
            price_ema,
        })
    }
}
