use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One closed OHLCV candle fetched from the exchange.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Candle interval supported by the scheduler and the exchange API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CandleInterval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    FourHours,
    OneDay,
}

impl CandleInterval {
    /// Interval label in the exchange's kline notation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::OneMinute => "1m",
            CandleInterval::FiveMinutes => "5m",
            CandleInterval::FifteenMinutes => "15m",
            CandleInterval::ThirtyMinutes => "30m",
            CandleInterval::OneHour => "1h",
            CandleInterval::FourHours => "4h",
            CandleInterval::OneDay => "1d",
        }
    }

    pub fn duration(&self) -> std::time::Duration {
        let secs = match self {
            CandleInterval::OneMinute => 60,
            CandleInterval::FiveMinutes => 5 * 60,
            CandleInterval::FifteenMinutes => 15 * 60,
            CandleInterval::ThirtyMinutes => 30 * 60,
            CandleInterval::OneHour => 3600,
            CandleInterval::FourHours => 4 * 3600,
            CandleInterval::OneDay => 24 * 3600,
        };
        std::time::Duration::from_secs(secs)
    }
}

impl std::str::FromStr for CandleInterval {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(CandleInterval::OneMinute),
            "5m" => Ok(CandleInterval::FiveMinutes),
            "15m" => Ok(CandleInterval::FifteenMinutes),
            "30m" => Ok(CandleInterval::ThirtyMinutes),
            "1h" => Ok(CandleInterval::OneHour),
            "4h" => Ok(CandleInterval::FourHours),
            "1d" => Ok(CandleInterval::OneDay),
            other => Err(crate::Error::Config(format!(
                "unsupported candle interval '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for CandleInterval {
    type Error = crate::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CandleInterval> for String {
    fn from(i: CandleInterval) -> String {
        i.as_str().to_string()
    }
}

impl std::fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Free (non-locked) balances at decision time. Owned by a single cycle,
/// never cached across cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balances {
    /// Free amount of the quote currency (e.g. USDT).
    pub quote_free: f64,
    /// Free amount of the base currency (e.g. SOL).
    pub base_free: f64,
}

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Confirmation of a submitted market order returned by the exchange.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    pub order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    /// Average fill price when the exchange reports fills.
    pub fill_price: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Why the evaluator held instead of trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    /// No entry or exit predicate fired.
    NoSignal,
    /// Entry fired but the sized order fell below the minimum order amount.
    BelowMinOrder,
}

impl std::fmt::Display for HoldReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldReason::NoSignal => write!(f, "no signal"),
            HoldReason::BelowMinOrder => write!(f, "insufficient for minimum order"),
        }
    }
}

/// Outcome of one evaluation cycle.
///
/// Buy quantities are in base-currency units sized from the quote balance;
/// sell quantities are base-currency units of the free balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Buy { quantity: f64 },
    SellFull { quantity: f64 },
    SellPartial { quantity: f64 },
    Hold { reason: HoldReason },
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Buy { quantity } => write!(f, "BUY {quantity}"),
            Decision::SellFull { quantity } => write!(f, "SELL_FULL {quantity}"),
            Decision::SellPartial { quantity } => write!(f, "SELL_PARTIAL {quantity}"),
            Decision::Hold { reason } => write!(f, "HOLD ({reason})"),
        }
    }
}

/// Whether the bot trades against the real exchange or the testnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Live,
    Sandbox,
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingMode::Live => write!(f, "live"),
            TradingMode::Sandbox => write!(f, "sandbox"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_round_trips_through_labels() {
        for label in ["1m", "5m", "15m", "30m", "1h", "4h", "1d"] {
            let interval: CandleInterval = label.parse().unwrap();
            assert_eq!(interval.as_str(), label);
        }
    }

    #[test]
    fn unknown_interval_is_a_config_error() {
        let parsed = "7m".parse::<CandleInterval>();
        assert!(matches!(parsed, Err(crate::Error::Config(_))));
    }

    #[test]
    fn interval_durations_are_consistent() {
        let five: CandleInterval = "5m".parse().unwrap();
        assert_eq!(five.duration().as_secs(), 300);
        let hour: CandleInterval = "1h".parse().unwrap();
        assert_eq!(hour.duration().as_secs(), 3600);
    }

    #[test]
    fn hold_reason_renders_minimum_message() {
        let d = Decision::Hold {
            reason: HoldReason::BelowMinOrder,
        };
        assert_eq!(d.to_string(), "HOLD (insufficient for minimum order)");
    }
}
