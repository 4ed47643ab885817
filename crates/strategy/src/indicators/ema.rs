//! Exponential moving average.
//!
//! k = 2/(n+1), seeded with the SMA of the first `n` values, then
//! EMA[i] = x[i]*k + EMA[i-1]*(1-k). The first (n-1) points are warmup.

/// Full EMA series aligned with `data`. Warmup points are `NaN`.
pub fn series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![f64::NAN; data.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = vec![f64::NAN; data.len()];

    let seed: f64 = data[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = seed;

    let mut ema = seed;
    for i in period..data.len() {
        ema = data[i] * k + ema * (1.0 - k);
        out[i] = ema;
    }
    out
}

/// Most recent EMA value, or `None` while still in warmup.
pub fn latest(data: &[f64], period: usize) -> Option<f64> {
    series(data, period).last().copied().filter(|v| v.is_finite())
}
