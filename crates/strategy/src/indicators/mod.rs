pub mod ema;
pub mod macd;
pub mod rsi;
pub mod stoch_rsi;

pub use macd::{MacdIndicator, MacdPoint};
pub use rsi::RsiIndicator;
pub use stoch_rsi::StochRsiIndicator;

/// Simple moving average over the trailing `period` values.
pub fn sma_latest(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    Some(data[data.len() - period..].iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_averages_the_tail() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((sma_latest(&data, 2).unwrap() - 4.5).abs() < 1e-12);
        assert!((sma_latest(&data, 5).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn sma_rejects_short_input() {
        assert!(sma_latest(&[1.0, 2.0], 3).is_none());
        assert!(sma_latest(&[1.0], 0).is_none());
    }
}
