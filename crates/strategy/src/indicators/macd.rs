//! MACD (Moving Average Convergence/Divergence).
//!
//! MACD line = EMA(fast) − EMA(slow); signal = EMA(macd line, signal period);
//! histogram = macd − signal. Only the latest point is surfaced.

use super::ema;

#[derive(Debug, Clone, Copy)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Latest MACD point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast < slow, "MACD fast period must be less than slow period");
        Self { fast, slow, signal }
    }

    /// Compute the latest MACD point from closes (oldest first).
    /// Needs at least `slow + signal - 1` closes; returns `None` otherwise.
    pub fn compute(&self, closes: &[f64]) -> Option<MacdPoint> {
        if closes.len() < self.slow + self.signal - 1 {
            return None;
        }

        let fast_ema = ema::series(closes, self.fast);
        let slow_ema = ema::series(closes, self.slow);

        // MACD line is defined once the slow EMA leaves warmup.
        let macd_line: Vec<f64> = (self.slow - 1..closes.len())
            .map(|i| fast_ema[i] - slow_ema[i])
            .collect();

        let signal_line = ema::series(&macd_line, self.signal);

        let macd = *macd_line.last()?;
        let signal = *signal_line.last()?;
        if !macd.is_finite() || !signal.is_finite() {
            return None;
        }

        Some(MacdPoint {
            macd,
            signal,
            histogram: macd - signal,
        })
    }
}
