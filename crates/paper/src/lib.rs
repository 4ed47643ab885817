use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use common::{
    Balances, Candle, CandleInterval, Error, OrderReceipt, OrderSide, Result, SpotExchange,
};

/// Simulated exchange for tests and dry runs.
///
/// Fills are simulated at the latest candle close with configurable
/// slippage; balances are adjusted in memory. No real orders are ever
/// sent anywhere.
pub struct PaperExchange {
    balances: RwLock<Balances>,
    candles: RwLock<Vec<Candle>>,
    /// Slippage in basis points applied to all fills.
    slippage_bps: f64,
}

impl PaperExchange {
    pub fn new(quote_free: f64, base_free: f64, slippage_bps: f64) -> Self {
        info!(quote_free, base_free, slippage_bps, "PaperExchange initialized");
        Self {
            balances: RwLock::new(Balances {
                quote_free,
                base_free,
            }),
            candles: RwLock::new(Vec::new()),
            slippage_bps,
        }
    }

    /// Replace the candle history served to callers.
    pub async fn set_candles(&self, candles: Vec<Candle>) {
        *self.candles.write().await = candles;
    }

    pub async fn balances(&self) -> Balances {
        *self.balances.read().await
    }

    async fn mark_price(&self) -> Result<f64> {
        self.candles
            .read()
            .await
            .last()
            .map(|c| c.close)
            .ok_or_else(|| Error::Connectivity("paper exchange has no candle history".into()))
    }

    fn receipt(&self, symbol: &str, side: OrderSide, quantity: f64, fill_price: f64) -> OrderReceipt {
        OrderReceipt {
            order_id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            side,
            quantity,
            fill_price: Some(fill_price),
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl SpotExchange for PaperExchange {
    async fn free_balances(&self, _quote_asset: &str, _base_asset: &str) -> Result<Balances> {
        Ok(*self.balances.read().await)
    }

    async fn recent_candles(
        &self,
        _symbol: &str,
        _interval: CandleInterval,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let candles = self.candles.read().await;
        let start = candles.len().saturating_sub(limit);
        Ok(candles[start..].to_vec())
    }

    async fn last_price(&self, _symbol: &str) -> Result<f64> {
        self.mark_price().await
    }

    async fn market_buy(&self, symbol: &str, quantity: f64) -> Result<OrderReceipt> {
        let mark = self.mark_price().await?;
        // Buys pay more under slippage.
        let fill_price = mark * (1.0 + self.slippage_bps / 10_000.0);
        let cost = quantity * fill_price;

        let mut balances = self.balances.write().await;
        if cost > balances.quote_free {
            return Err(Error::Order(format!(
                "insufficient quote balance: need {cost:.4}, have {:.4}",
                balances.quote_free
            )));
        }
        balances.quote_free -= cost;
        balances.base_free += quantity;

        debug!(%symbol, mark, fill_price, quantity, "paper buy filled");
        Ok(self.receipt(symbol, OrderSide::Buy, quantity, fill_price))
    }

    async fn market_sell(&self, symbol: &str, quantity: f64) -> Result<OrderReceipt> {
        let mark = self.mark_price().await?;
        // Sells receive less under slippage.
        let fill_price = mark * (1.0 - self.slippage_bps / 10_000.0);

        let mut balances = self.balances.write().await;
        if quantity > balances.base_free + 1e-9 {
            return Err(Error::Order(format!(
                "insufficient base balance: need {quantity:.4}, have {:.4}",
                balances.base_free
            )));
        }
        balances.base_free -= quantity;
        balances.quote_free += quantity * fill_price;

        debug!(%symbol, mark, fill_price, quantity, "paper sell filled");
        Ok(self.receipt(symbol, OrderSide::Sell, quantity, fill_price))
    }
}
