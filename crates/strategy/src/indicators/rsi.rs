//! RSI (Relative Strength Index), Wilder's smoothing.
//!
//! First average gain/loss is the simple mean over the initial `period`
//! changes; subsequent averages use avg = (prev*(n-1) + current)/n.
//! RSI = 100 - 100/(1 + avg_gain/avg_loss); 100 when avg_loss is zero.

#[derive(Debug, Clone, Copy)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "RSI period must be >= 2");
        Self { period }
    }

    /// Wilder RSI series, one value per close starting at index `period`.
    /// Empty when fewer than `period + 1` closes are available.
    pub fn series(&self, closes: &[f64]) -> Vec<f64> {
        if closes.len() < self.period + 1 {
            return Vec::new();
        }

        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        let mut avg_gain = changes[..self.period]
            .iter()
            .filter(|&&c| c > 0.0)
            .sum::<f64>()
            / self.period as f64;
        let mut avg_loss = changes[..self.period]
            .iter()
            .filter(|&&c| c < 0.0)
            .map(|c| c.abs())
            .sum::<f64>()
            / self.period as f64;

        let mut out = Vec::with_capacity(changes.len() - self.period + 1);
        out.push(point(avg_gain, avg_loss));

        for &change in &changes[self.period..] {
            let gain = if change > 0.0 { change } else { 0.0 };
            let loss = if change < 0.0 { change.abs() } else { 0.0 };
            avg_gain = (avg_gain * (self.period - 1) as f64 + gain) / self.period as f64;
            avg_loss = (avg_loss * (self.period - 1) as f64 + loss) / self.period as f64;
            out.push(point(avg_gain, avg_loss));
        }
        out
    }

    /// Most recent RSI value, or `None` with insufficient data.
    pub fn latest(&self, closes: &[f64]) -> Option<f64> {
        self.series(closes).last().copied()
    }
}

fn point(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
