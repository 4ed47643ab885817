use crate::{CandleInterval, Error, Result, TradingMode};

/// Order sizing and capacity limits, environment-provided.
#[derive(Debug, Clone, Copy)]
pub struct TradeLimits {
    /// Maximum consecutive buys without an intervening full exit.
    pub limit_buys: u32,
    /// Smallest accepted order quantity in base units.
    pub min_order_amount: f64,
    /// Per-trade cap in base units.
    pub max_trade_amount: f64,
    /// Quote balance that must remain available before any buy.
    pub min_quote_reserve: f64,
}

impl Default for TradeLimits {
    fn default() -> Self {
        Self {
            limit_buys: 3,
            min_order_amount: 0.1,
            max_trade_amount: 0.5,
            min_quote_reserve: 10.0,
        }
    }
}

/// All configuration loaded from environment variables at startup.
/// Loads `.env` if present; any missing or invalid required variable is a
/// fatal `Error::Config`.
#[derive(Debug, Clone)]
pub struct Config {
    // Exchange credentials
    pub api_key: String,
    pub api_secret: String,

    // Trading
    pub trading_mode: TradingMode,
    pub base_asset: String,
    pub quote_asset: String,
    pub candle_interval: CandleInterval,
    pub limits: TradeLimits,

    // Strategy parameter file path
    pub strategy_config_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let trading_mode = match required("TRADING_MODE")?.to_lowercase().as_str() {
            "live" => TradingMode::Live,
            "sandbox" => TradingMode::Sandbox,
            other => {
                return Err(Error::Config(format!(
                    "TRADING_MODE must be 'live' or 'sandbox', got '{other}'"
                )))
            }
        };

        let candle_interval = optional("CANDLE_INTERVAL")
            .unwrap_or_else(|| "5m".to_string())
            .parse()?;

        let limits = TradeLimits {
            limit_buys: parsed("LIMIT_BUYS", TradeLimits::default().limit_buys)?,
            min_order_amount: parsed("MIN_ORDER_AMOUNT", TradeLimits::default().min_order_amount)?,
            max_trade_amount: parsed("MAX_TRADE_AMOUNT", TradeLimits::default().max_trade_amount)?,
            min_quote_reserve: parsed(
                "MIN_QUOTE_RESERVE",
                TradeLimits::default().min_quote_reserve,
            )?,
        };

        Ok(Config {
            api_key: required("BINANCE_API_KEY")?,
            api_secret: required("BINANCE_SECRET")?,
            trading_mode,
            base_asset: optional("BASE_ASSET").unwrap_or_else(|| "SOL".to_string()),
            quote_asset: optional("QUOTE_ASSET").unwrap_or_else(|| "USDT".to_string()),
            candle_interval,
            limits,
            strategy_config_path: optional("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/momentum-5m.toml".to_string()),
        })
    }

    /// Exchange symbol for the configured pair, e.g. "SOLUSDT".
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base_asset, self.quote_asset)
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| Error::Config(format!("required environment variable '{key}' is not set")))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match optional(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("environment variable '{key}' is invalid: '{raw}'"))),
    }
}
