//! Stochastic RSI: a stochastic oscillator applied to the Wilder RSI series.
//!
//! %K[t] = (RSI[t] − min) / (max − min) × 100 over the lookback window.
//! Points are undefined during warmup and when the window is flat
//! (max == min); undefined points are filtered and the most recent
//! defined %K is selected.

use super::rsi::RsiIndicator;

#[derive(Debug, Clone, Copy)]
pub struct StochRsiIndicator {
    /// Period of the underlying RSI series.
    pub rsi_period: usize,
    /// Lookback window of the stochastic transform.
    pub stoch_period: usize,
}

impl StochRsiIndicator {
    pub fn new(rsi_period: usize, stoch_period: usize) -> Self {
        assert!(stoch_period >= 2, "stochastic lookback must be >= 2");
        Self {
            rsi_period,
            stoch_period,
        }
    }

    /// Most recent defined %K, or `None` when every point is undefined.
    pub fn latest(&self, closes: &[f64]) -> Option<f64> {
        let rsi = RsiIndicator::new(self.rsi_period).series(closes);
        if rsi.len() < self.stoch_period {
            return None;
        }

        let mut last_defined = None;
        for t in self.stoch_period - 1..rsi.len() {
            let window = &rsi[t + 1 - self.stoch_period..=t];
            let min = window.iter().copied().fold(f64::INFINITY, f64::min);
            let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max - min > f64::EPSILON {
                last_defined = Some((rsi[t] - min) / (max - min) * 100.0);
            }
        }
        last_defined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_with_short_series() {
        let stoch = StochRsiIndicator::new(14, 14);
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert!(stoch.latest(&prices).is_none());
    }

    #[test]
    fn none_when_every_window_is_flat() {
        // Constant prices give a constant RSI, so every window is flat.
        let stoch = StochRsiIndicator::new(14, 14);
        let prices = vec![100.0; 60];
        assert!(stoch.latest(&prices).is_none());
    }

    #[test]
    fn rally_after_decline_reads_high() {
        let stoch = StochRsiIndicator::new(14, 14);
        let mut prices: Vec<f64> = (0..50).map(|i| 200.0 - i as f64).collect();
        prices.extend((0..30).map(|i| 150.0 + i as f64 * 2.0));
        let value = stoch.latest(&prices).unwrap();
        assert!(value > 80.0, "expected overbought reading, got {value}");
    }

    #[test]
    fn selloff_after_rally_reads_low() {
        let stoch = StochRsiIndicator::new(14, 14);
        let mut prices: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        prices.extend((0..30).map(|i| 150.0 - i as f64 * 2.0));
        let value = stoch.latest(&prices).unwrap();
        assert!(value < 20.0, "expected oversold reading, got {value}");
    }

    #[test]
    fn values_stay_in_percent_range() {
        let stoch = StochRsiIndicator::new(14, 14);
        let prices: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0)
            .collect();
        let value = stoch.latest(&prices).unwrap();
        assert!((0.0..=100.0).contains(&value), "%K out of range: {value}");
    }
}
