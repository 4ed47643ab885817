use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Inclusive bounds an oscillator value is clamped into before the
/// evaluator sees it. Keeps degenerate extremes (0/100 readings) from
/// driving spurious signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClampBounds {
    pub lo: f64,
    pub hi: f64,
}

impl ClampBounds {
    pub fn apply(&self, value: f64) -> f64 {
        value.clamp(self.lo, self.hi)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochRsiParams {
    pub rsi_period: usize,
    pub stoch_period: usize,
}

/// Buy-side predicate, selected per strategy file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum EntryRule {
    /// Trend confirmation: MACD above signal and above zero, histogram
    /// above a price-relative floor, oscillators below their ceilings,
    /// volume above its moving average, price above its EMA.
    TrendMomentum {
        stoch_rsi_max: f64,
        rsi_max: f64,
        min_histogram_ratio: f64,
    },
    /// Oversold mean reversion: MACD below zero with depressed RSI and
    /// StochRSI.
    MeanReversion { rsi_max: f64, stoch_rsi_max: f64 },
}

/// Partial-exit predicate. The ideal (full) exit is always
/// `stoch_rsi > ideal_exit_stoch_rsi` and is evaluated first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum ExitRule {
    /// Any overbought or momentum-loss condition: StochRSI or RSI above
    /// a ceiling, MACD below its signal line, or price below its EMA.
    Overbought { stoch_rsi_above: f64, rsi_above: f64 },
    /// Elevated MACD combined with elevated RSI.
    MomentumFade { macd_above: f64, rsi_above: f64 },
}

/// Parameters of one strategy variant, loaded from a TOML file.
/// Both shipped variants are pure configuration of the same engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyParams {
    pub name: String,
    pub rsi_period: usize,
    pub rsi_clamp: ClampBounds,
    pub macd: MacdParams,
    pub stoch_rsi: StochRsiParams,
    /// Fallback when every stochastic point is undefined (flat market).
    #[serde(default = "default_stoch_rsi_fallback")]
    pub stoch_rsi_default: f64,
    #[serde(default = "default_volume_ma_period")]
    pub volume_ma_period: usize,
    #[serde(default = "default_price_ema_period")]
    pub price_ema_period: usize,
    /// StochRSI ceiling above which the full position is liquidated.
    pub ideal_exit_stoch_rsi: f64,
    /// Fraction of the free base balance sold on a partial exit.
    pub partial_exit_fraction: f64,
    pub entry: EntryRule,
    pub exit: ExitRule,
}

fn default_stoch_rsi_fallback() -> f64 {
    50.0
}

fn default_volume_ma_period() -> usize {
    10
}

fn default_price_ema_period() -> usize {
    9
}

impl StrategyParams {
    /// Load from a TOML file. Malformed files are a fatal config error.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read strategy file '{path}': {e}")))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse strategy file '{path}': {e}")))
    }

    /// 5-minute trend-following variant (volume and EMA filtered).
    pub fn momentum_5m() -> Self {
        Self {
            name: "momentum-5m".to_string(),
            rsi_period: 14,
            rsi_clamp: ClampBounds { lo: 1.0, hi: 99.0 },
            macd: MacdParams {
                fast: 12,
                slow: 26,
                signal: 9,
            },
            stoch_rsi: StochRsiParams {
                rsi_period: 14,
                stoch_period: 14,
            },
            stoch_rsi_default: 50.0,
            volume_ma_period: 10,
            price_ema_period: 9,
            ideal_exit_stoch_rsi: 90.0,
            partial_exit_fraction: 0.30,
            entry: EntryRule::TrendMomentum {
                stoch_rsi_max: 80.0,
                rsi_max: 65.0,
                min_histogram_ratio: 0.0005,
            },
            exit: ExitRule::Overbought {
                stoch_rsi_above: 85.0,
                rsi_above: 70.0,
            },
        }
    }

    /// 1-hour oversold mean-reversion variant.
    pub fn mean_reversion_1h() -> Self {
        Self {
            name: "mean-reversion-1h".to_string(),
            rsi_period: 14,
            rsi_clamp: ClampBounds { lo: 5.0, hi: 95.0 },
            macd: MacdParams {
                fast: 12,
                slow: 26,
                signal: 9,
            },
            stoch_rsi: StochRsiParams {
                rsi_period: 21,
                stoch_period: 14,
            },
            stoch_rsi_default: 50.0,
            volume_ma_period: 10,
            price_ema_period: 9,
            ideal_exit_stoch_rsi: 90.0,
            partial_exit_fraction: 0.33,
            entry: EntryRule::MeanReversion {
                rsi_max: 30.0,
                stoch_rsi_max: 20.0,
            },
            exit: ExitRule::MomentumFade {
                macd_above: 0.5,
                rsi_above: 65.0,
            },
        }
    }

    /// Whether the configured rules read volume data.
    pub fn needs_volume(&self) -> bool {
        matches!(self.entry, EntryRule::TrendMomentum { .. })
    }

    /// Whether the configured rules read the price EMA.
    pub fn needs_price_ema(&self) -> bool {
        matches!(self.entry, EntryRule::TrendMomentum { .. })
            || matches!(self.exit, ExitRule::Overbought { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_toml_parses_to_the_preset() {
        let toml_src = r#"
            name = "momentum-5m"
            rsi_period = 14
            ideal_exit_stoch_rsi = 90.0
            partial_exit_fraction = 0.30

            [rsi_clamp]
            lo = 1.0
            hi = 99.0

            [macd]
            fast = 12
            slow = 26
            signal = 9

            [stoch_rsi]
            rsi_period = 14
            stoch_period = 14

            [entry]
            style = "trend_momentum"
            stoch_rsi_max = 80.0
            rsi_max = 65.0
            min_histogram_ratio = 0.0005

            [exit]
            style = "overbought"
            stoch_rsi_above = 85.0
            rsi_above = 70.0
        "#;
        let parsed: StrategyParams = toml::from_str(toml_src).unwrap();
        let preset = StrategyParams::momentum_5m();

        assert_eq!(parsed.name, preset.name);
        assert_eq!(parsed.rsi_period, preset.rsi_period);
        assert_eq!(parsed.volume_ma_period, 10); // serde default
        assert_eq!(parsed.price_ema_period, 9); // serde default
        assert!((parsed.stoch_rsi_default - 50.0).abs() < f64::EPSILON);
        assert!(matches!(parsed.entry, EntryRule::TrendMomentum { .. }));
        assert!(matches!(parsed.exit, ExitRule::Overbought { .. }));
    }

    #[test]
    fn variant_flags_follow_rule_styles() {
        let a = StrategyParams::momentum_5m();
        assert!(a.needs_volume());
        assert!(a.needs_price_ema());

        let b = StrategyParams::mean_reversion_1h();
        assert!(!b.needs_volume());
        assert!(!b.needs_price_ema());
    }

    #[test]
    fn clamp_bounds_are_inclusive() {
        let clamp = ClampBounds { lo: 1.0, hi: 99.0 };
        assert!((clamp.apply(120.0) - 99.0).abs() < f64::EPSILON);
        assert!((clamp.apply(-3.0) - 1.0).abs() < f64::EPSILON);
        assert!((clamp.apply(42.0) - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = StrategyParams::load("/nonexistent/strategy.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
