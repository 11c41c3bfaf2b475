//! Exchange metadata models.
//!
//! Mirrors the `exchangeInfo` payload of the Binance spot REST API. Only the
//! fields consumed by symbol selection are modeled; everything else in the
//! payload is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Trading status of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolStatus {
    /// Actively trading.
    #[serde(rename = "TRADING")]
    Trading,
    /// Any non-trading status (BREAK, HALT, delisted, ...).
    #[serde(untagged)]
    Other(String),
}

impl SymbolStatus {
    /// Returns true if the symbol is actively trading.
    #[must_use]
    pub const fn is_trading(&self) -> bool {
        matches!(self, Self::Trading)
    }
}

/// One symbol descriptor from the exchange metadata snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolDescriptor {
    /// Ticker string, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Trading status.
    pub status: SymbolStatus,
    /// Base asset of the pair (`BTC` in `BTCUSDT`).
    pub base_asset: String,
    /// Quote asset of the pair (`USDT` in `BTCUSDT`).
    pub quote_asset: String,
    /// Whether spot trading is allowed for this symbol.
    #[serde(default)]
    pub is_spot_trading_allowed: bool,
}

impl SymbolDescriptor {
    /// Creates a descriptor; used by fixtures and tests.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        status: SymbolStatus,
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
        is_spot_trading_allowed: bool,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            status,
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
            is_spot_trading_allowed,
        }
    }

    /// Returns true if the descriptor is eligible for the spot universe.
    #[must_use]
    pub fn is_tradable_spot(&self) -> bool {
        self.status.is_trading() && self.is_spot_trading_allowed
    }
}

impl std::fmt::Display for SymbolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.symbol, self.base_asset, self.quote_asset)
    }
}

/// Immutable exchange metadata snapshot, fetched once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExchangeInfo {
    /// All symbol descriptors known to the exchange.
    #[serde(default)]
    pub symbols: Vec<SymbolDescriptor>,
}

impl ExchangeInfo {
    /// Returns the number of descriptors in the snapshot.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the snapshot holds no descriptors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
