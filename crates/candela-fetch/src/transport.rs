//! Transport seam between the exchange client and the network.
//!
//! The client talks to a [`Transport`], never to `reqwest` directly. The live
//! implementation wraps a pooled HTTP client; [`FixtureTransport`] serves a
//! deterministic in-memory exchange for offline runs and tests. Which one is
//! used is decided once, at construction, by whoever builds the client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

use candela_types::Interval;

/// Errors that can occur at the transport layer.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("server returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated to a few hundred bytes.
        body: String,
    },

    /// The fixture has no handler for the requested path.
    #[error("no fixture for path: {0}")]
    UnknownPath(String),
}

/// Capability to fetch a JSON document from the exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues one GET for `path` with the given query pairs and decodes the
    /// response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status. There is no
    /// internal retry; callers decide whether a failure is fatal.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError>;
}

/// Configuration for the live HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL of the exchange REST API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("candela/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Live HTTP transport backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a new HTTP transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: TransportConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(TransportConfig::default())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.chars().take(300).collect();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Deterministic in-memory exchange for offline runs and tests.
///
/// Serves the same two endpoints as the live API: a fixed metadata snapshot
/// and generated kline rows in the exact wire format (prices as strings,
/// timestamps as millisecond numbers). The generated prices are a pure
/// function of the symbol and row index, so repeated runs are identical.
#[derive(Debug, Clone)]
pub struct FixtureTransport {
    info: Value,
}

impl FixtureTransport {
    /// Millisecond epoch the generated klines start from (2020-01-01 UTC).
    pub const EPOCH_MS: i64 = 1_577_836_800_000;

    /// Creates a fixture serving the given `exchangeInfo` payload.
    #[must_use]
    pub const fn new(info: Value) -> Self {
        Self { info }
    }

    /// Creates a fixture with a small built-in spot universe.
    ///
    /// The snapshot includes a leveraged ticker and a halted symbol so that
    /// selection filters are exercised end to end.
    #[must_use]
    pub fn sample() -> Self {
        let symbols = [
            ("BTCUSDT", "BTC", "USDT", "TRADING", true),
            ("ETHUSDT", "ETH", "USDT", "TRADING", true),
            ("SOLUSDT", "SOL", "USDT", "TRADING", true),
            ("BNBUSDT", "BNB", "USDT", "TRADING", true),
            ("XRPUSDT", "XRP", "USDT", "TRADING", true),
            ("BTCUPUSDT", "BTCUP", "USDT", "TRADING", true),
            ("LUNAUSDT", "LUNA", "USDT", "BREAK", false),
        ];
        let descriptors: Vec<Value> = symbols
            .iter()
            .map(|(symbol, base, quote, status, spot)| {
                json!({
                    "symbol": symbol,
                    "status": status,
                    "baseAsset": base,
                    "quoteAsset": quote,
                    "isSpotTradingAllowed": spot,
                })
            })
            .collect();
        Self::new(json!({ "symbols": descriptors }))
    }

    /// Reference price for a symbol, matched by base-asset substring.
    fn base_price(symbol: &str) -> f64 {
        const PRICES: &[(&str, f64)] = &[
            ("BTC", 50_000.0),
            ("ETH", 3_000.0),
            ("BNB", 400.0),
            ("SOL", 100.0),
            ("XRP", 0.6),
        ];
        PRICES
            .iter()
            .find(|(base, _)| symbol.contains(base))
            .map_or(10.0, |(_, price)| *price)
    }

    /// Generates kline rows in the exchange's 12-element wire format.
    fn klines(&self, query: &[(&str, String)]) -> Value {
        let get = |key: &str| query.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());

        let symbol = get("symbol").unwrap_or("BTCUSDT").to_string();
        let limit: usize = get("limit").and_then(|v| v.parse().ok()).unwrap_or(500);
        let start: i64 = get("startTime")
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::EPOCH_MS);
        let end: Option<i64> = get("endTime").and_then(|v| v.parse().ok());
        let step = get("interval")
            .and_then(|v| v.parse::<Interval>().ok())
            .unwrap_or_default()
            .milliseconds() as i64;

        let base = Self::base_price(&symbol);
        let mut rows = Vec::with_capacity(limit);
        for i in 0..limit as i64 {
            let open_time = start + i * step;
            if end.is_some_and(|e| open_time > e) {
                break;
            }
            // Deterministic wave around the reference price
            let open = base * (1.0 + 0.001 * ((i % 7) - 3) as f64);
            let high = open * 1.01;
            let low = open * 0.99;
            let close = open * (1.0 + 0.002 * (((i + 3) % 5) - 2) as f64);
            let volume = 100.0 + (i % 10) as f64 * 10.0;
            rows.push(json!([
                open_time,
                format!("{open:.2}"),
                format!("{high:.2}"),
                format!("{low:.2}"),
                format!("{close:.2}"),
                format!("{volume:.2}"),
                open_time + step - 1,
                "0",
                100,
                "0",
                "0",
                "0"
            ]));
        }
        Value::Array(rows)
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        if path.contains("exchangeInfo") {
            Ok(self.info.clone())
        } else if path.contains("klines") {
            Ok(self.klines(query))
        } else {
            Err(TransportError::UnknownPath(path.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_serves_exchange_info() {
        let fixture = FixtureTransport::sample();
        let info = fixture.get_json("/api/v3/exchangeInfo", &[]).await.unwrap();
        let symbols = info["symbols"].as_array().unwrap();
        assert_eq!(symbols.len(), 7);
        assert_eq!(symbols[0]["symbol"], "BTCUSDT");
    }

    #[tokio::test]
    async fn test_fixture_klines_are_deterministic() {
        let fixture = FixtureTransport::sample();
        let query = [
            ("symbol", "BTCUSDT".to_string()),
            ("interval", "1d".to_string()),
            ("limit", "5".to_string()),
        ];
        let first = fixture.get_json("/api/v3/klines", &query).await.unwrap();
        let second = fixture.get_json("/api/v3/klines", &query).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_fixture_klines_wire_format() {
        let fixture = FixtureTransport::sample();
        let query = [
            ("symbol", "ETHUSDT".to_string()),
            ("interval", "1d".to_string()),
            ("limit", "2".to_string()),
        ];
        let rows = fixture.get_json("/api/v3/klines", &query).await.unwrap();
        let row = rows[0].as_array().unwrap();
        assert_eq!(row.len(), 12);
        assert!(row[0].is_i64());
        assert!(row[1].is_string());
        // Consecutive daily rows are one day apart
        let step = rows[1][0].as_i64().unwrap() - rows[0][0].as_i64().unwrap();
        assert_eq!(step, 86_400_000);
    }

    #[tokio::test]
    async fn test_fixture_respects_end_time() {
        let fixture = FixtureTransport::sample();
        let end = FixtureTransport::EPOCH_MS + 86_400_000;
        let query = [
            ("symbol", "BTCUSDT".to_string()),
            ("interval", "1d".to_string()),
            ("limit", "100".to_string()),
            ("endTime", end.to_string()),
        ];
        let rows = fixture.get_json("/api/v3/klines", &query).await.unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fixture_unknown_path() {
        let fixture = FixtureTransport::sample();
        let result = fixture.get_json("/api/v3/depth", &[]).await;
        assert!(matches!(result, Err(TransportError::UnknownPath(_))));
    }

    #[test]
    fn test_http_transport_creation() {
        assert!(HttpTransport::with_defaults().is_ok());
    }
}
