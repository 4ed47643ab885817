use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use common::{
    Balances, Candle, CandleInterval, Error, OrderReceipt, OrderSide, Result, SpotExchange,
    TradingMode,
};

const LIVE_URL: &str = "https://api.binance.com";
const SANDBOX_URL: &str = "https://testnet.binance.vision";

/// REST API client for Binance spot. Handles signing, balance and kline
/// queries, and market order placement against the live API or the testnet.
pub struct BinanceClient {
    api_key: String,
    secret: String,
    base_url: String,
    http: Client,
}

impl BinanceClient {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>, mode: TradingMode) -> Self {
        let base_url = match mode {
            TradingMode::Live => LIVE_URL,
            TradingMode::Sandbox => SANDBOX_URL,
        };
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            base_url: base_url.to_string(),
            http: Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    fn timestamp_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    fn sign(&self, query: &str) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn signed_get(&self, path: &str, params: &str) -> Result<String> {
        let ts = Self::timestamp_ms();
        let query = if params.is_empty() {
            format!("timestamp={ts}")
        } else {
            format!("{params}&timestamp={ts}")
        };
        let signature = self.sign(&query);
        let url = format!("{}{path}?{query}&signature={signature}", self.base_url);

        let resp = self
            .http
            .get(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Connectivity(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }

    async fn signed_post(&self, path: &str, params: &str) -> Result<String> {
        let ts = Self::timestamp_ms();
        let query = format!("{params}&timestamp={ts}");
        let signature = self.sign(&query);
        let body = format!("{query}&signature={signature}");
        let url = format!("{}{path}", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        if !status.is_success() {
            // A reachable exchange refusing the request is an order-level
            // rejection (insufficient funds, below minimum notional, ...).
            return Err(Error::Order(format!("HTTP {status}: {text}")));
        }
        Ok(text)
    }

    async fn submit_market(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: f64,
    ) -> Result<OrderReceipt> {
        let params = format!("symbol={symbol}&side={side}&type=MARKET&quantity={quantity}");

        debug!(%symbol, %side, quantity, "submitting market order");
        let body = self.signed_post("/api/v3/order", &params).await?;

        let resp: OrderResponse =
            serde_json::from_str(&body).map_err(|e| Error::Order(e.to_string()))?;

        let fill_price = resp.fills.first().and_then(|f| f.price.parse::<f64>().ok());

        Ok(OrderReceipt {
            order_id: resp.client_order_id,
            symbol: symbol.to_string(),
            side,
            quantity,
            fill_price,
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl SpotExchange for BinanceClient {
    async fn free_balances(&self, quote_asset: &str, base_asset: &str) -> Result<Balances> {
        let body = self.signed_get("/api/v3/account", "").await?;
        let account: AccountResponse =
            serde_json::from_str(&body).map_err(|e| Error::Connectivity(e.to_string()))?;

        let free = |asset: &str| {
            account
                .balances
                .iter()
                .find(|b| b.asset == asset)
                .and_then(|b| b.free.parse::<f64>().ok())
                .unwrap_or(0.0)
        };

        Ok(Balances {
            quote_free: free(quote_asset),
            base_free: free(base_asset),
        })
    }

    async fn recent_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/api/v3/klines?symbol={symbol}&interval={}&limit={limit}",
            self.base_url,
            interval.as_str()
        );
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Connectivity(format!("HTTP {status}: {body}")));
        }

        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| Error::Connectivity(e.to_string()))?;
        rows.iter().map(parse_kline).collect()
    }

    async fn last_price(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/api/v3/ticker/price?symbol={symbol}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        let ticker: PriceTicker = resp
            .json()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        ticker
            .price
            .parse::<f64>()
            .map_err(|e| Error::Connectivity(e.to_string()))
    }

    async fn market_buy(&self, symbol: &str, quantity: f64) -> Result<OrderReceipt> {
        self.submit_market(symbol, OrderSide::Buy, quantity).await
    }

    async fn market_sell(&self, symbol: &str, quantity: f64) -> Result<OrderReceipt> {
        self.submit_market(symbol, OrderSide::Sell, quantity).await
    }
}

/// Parse one kline row: `[openTime, "open", "high", "low", "close", "volume", ...]`.
fn parse_kline(row: &serde_json::Value) -> Result<Candle> {
    let arr = row
        .as_array()
        .filter(|a| a.len() >= 6)
        .ok_or_else(|| Error::Connectivity("malformed kline row".into()))?;

    let open_time_ms = arr[0]
        .as_i64()
        .ok_or_else(|| Error::Connectivity("kline open time is not an integer".into()))?;
    let open_time: DateTime<Utc> = DateTime::from_timestamp_millis(open_time_ms)
        .ok_or_else(|| Error::Connectivity("kline open time out of range".into()))?;

    let field = |i: usize, name: &str| -> Result<f64> {
        arr[i]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| Error::Connectivity(format!("kline {name} is not a decimal string")))
    };

    Ok(Candle {
        open_time,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
    client_order_id: String,
    #[serde(default)]
    fills: Vec<FillDetail>,
}

#[derive(Deserialize)]
struct FillDetail {
    price: String,
}

#[derive(Deserialize)]
struct AccountResponse {
    balances: Vec<AssetBalance>,
}

#[derive(Deserialize)]
struct AssetBalance {
    asset: String,
    free: String,
}

#[derive(Deserialize)]
struct PriceTicker {
    price: String,
}
