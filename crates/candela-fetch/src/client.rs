//! Typed exchange client over a [`Transport`].

use serde_json::Value;

use candela_types::{CandelaError, ExchangeInfo, Interval, Result};

use crate::transport::{Transport, TransportError};

/// Path of the metadata endpoint.
const EXCHANGE_INFO_PATH: &str = "/api/v3/exchangeInfo";

/// Path of the candle endpoint.
const KLINES_PATH: &str = "/api/v3/klines";

/// Typed client for the two exchange endpoints the pipeline consumes.
///
/// The client issues exactly one request per call and performs no retries;
/// failures surface as [`CandelaError::Transport`] keyed by the symbol (or
/// `exchangeInfo` for metadata) so the batch loop can record and move on.
#[derive(Debug, Clone)]
pub struct ExchangeClient<T> {
    transport: T,
}

impl<T: Transport> ExchangeClient<T> {
    /// Creates a client over the given transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetches the exchange metadata snapshot.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails; the caller treats this
    /// as fatal since no symbol universe can be derived without it.
    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        let value = self
            .transport
            .get_json(EXCHANGE_INFO_PATH, &[])
            .await
            .map_err(|e| wrap("exchangeInfo", e))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches raw kline rows for one symbol.
    ///
    /// Each row is a 12-element fixed-order array; only elements 0-6 are
    /// consumed downstream. An empty array means the symbol has no data in
    /// the requested window, which is not an error at this layer.
    ///
    /// # Errors
    ///
    /// Returns a transport error keyed by `symbol` if the request fails, or a
    /// parse error if the response is not a JSON array.
    pub async fn klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> Result<Vec<Value>> {
        let mut query = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(start) = start_time {
            query.push(("startTime", start.to_string()));
        }
        if let Some(end) = end_time {
            query.push(("endTime", end.to_string()));
        }

        let value = self
            .transport
            .get_json(KLINES_PATH, &query)
            .await
            .map_err(|e| wrap(symbol, e))?;

        match value {
            Value::Array(rows) => Ok(rows),
            other => Err(CandelaError::Parse(format!(
                "expected kline array for {symbol}, got: {other}"
            ))),
        }
    }
}

/// Maps a transport failure onto the error taxonomy, keyed by symbol.
fn wrap(symbol: &str, err: TransportError) -> CandelaError {
    match err {
        TransportError::Status { status, body } => CandelaError::Api { status, body },
        other => CandelaError::transport(symbol, other),
    }
}
