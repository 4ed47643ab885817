use async_trait::async_trait;

use crate::{Balances, Candle, CandleInterval, OrderReceipt, Result};

/// Abstraction over the exchange connection.
///
/// `BinanceClient` implements this for live and sandbox trading;
/// `PaperExchange` implements it for simulation in tests. Timeouts and
/// rate limiting are the implementation's concern; the cycle runner treats
/// every failure as terminal for the current cycle.
#[async_trait]
pub trait SpotExchange: Send + Sync {
    /// Free (non-locked) balances for the quote and base assets.
    async fn free_balances(&self, quote_asset: &str, base_asset: &str) -> Result<Balances>;

    /// The most recent `limit` candles for `symbol`, oldest first.
    async fn recent_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: usize,
    ) -> Result<Vec<Candle>>;

    /// Latest traded price for `symbol`.
    async fn last_price(&self, symbol: &str) -> Result<f64>;

    /// Submit a market buy of `quantity` base units.
    async fn market_buy(&self, symbol: &str, quantity: f64) -> Result<OrderReceipt>;

    /// Submit a market sell of `quantity` base units.
    async fn market_sell(&self, symbol: &str, quantity: f64) -> Result<OrderReceipt>;
}
