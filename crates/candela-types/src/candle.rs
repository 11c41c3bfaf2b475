//! Candle (kline) data representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Field;

/// One OHLCV time bucket for one symbol.
///
/// A numeric field whose source value was unavailable holds NaN; storage
/// treats NaN as a missing cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket open time (UTC).
    pub open_time: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price during the bucket.
    pub high: f64,
    /// Lowest price during the bucket.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Base-asset volume traded during the bucket.
    pub volume: f64,
    /// Bucket close time (UTC).
    pub close_time: DateTime<Utc>,
}

impl Candle {
    /// Creates a new candle.
    #[must_use]
    pub const fn new(
        open_time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: DateTime<Utc>,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time,
        }
    }

    /// Returns the value of the given OHLCV field.
    #[must_use]
    pub const fn field(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns true if this is a bullish (green) candle.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Ordered candle series for one symbol.
///
/// Candles are kept sorted by open time ascending with no duplicate open
/// times. Construction through [`SymbolSeries::from_candles`] enforces both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    symbol: String,
    candles: Vec<Candle>,
}

impl SymbolSeries {
    /// Creates an empty series for the given symbol.
    #[must_use]
    pub const fn empty(symbol: String) -> Self {
        Self {
            symbol,
            candles: Vec::new(),
        }
    }

    /// Builds a series from unordered candles.
    ///
    /// Candles are sorted by open time; when two candles share an open time
    /// the first one in input order wins.
    #[must_use]
    pub fn from_candles(symbol: impl Into<String>, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.open_time);
        candles.dedup_by_key(|c| c.open_time);
        Self {
            symbol: symbol.into(),
            candles,
        }
    }

    /// Returns the symbol this series belongs to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the candles, ordered by open time ascending.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Returns the number of candles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.candles.len()
    }

    /// Returns true if the series holds no candles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Returns the earliest open time, if any.
    #[must_use]
    pub fn first_open_time(&self) -> Option<DateTime<Utc>> {
        self.candles.first().map(|c| c.open_time)
    }

    /// Returns the latest open time, if any.
    #[must_use]
    pub fn last_open_time(&self) -> Option<DateTime<Utc>> {
        self.candles.last().map(|c| c.open_time)
    }

    /// Projects one field out of the series as `(open_time, value)` pairs.
    pub fn project(&self, field: Field) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.candles.iter().map(move |c| (c.open_time, c.field(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle_at(day: u32, close: f64) -> Candle {
        let open_time = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        let close_time = Utc.with_ymd_and_hms(2024, 1, day, 23, 59, 59).unwrap();
        Candle::new(open_time, close - 1.0, close + 2.0, close - 3.0, close, 100.0, close_time)
    }

    #[test]
    fn test_field_projection() {
        let c = candle_at(1, 50.0);
        assert!((c.field(Field::Open) - 49.0).abs() < 1e-10);
        assert!((c.field(Field::High) - 52.0).abs() < 1e-10);
        assert!((c.field(Field::Low) - 47.0).abs() < 1e-10);
        assert!((c.field(Field::Close) - 50.0).abs() < 1e-10);
        assert!((c.field(Field::Volume) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_from_candles_sorts_by_open_time() {
        let series =
            SymbolSeries::from_candles("BTCUSDT", vec![candle_at(3, 3.0), candle_at(1, 1.0)]);
        assert_eq!(series.len(), 2);
        assert!(series.candles()[0].open_time < series.candles()[1].open_time);
    }

    #[test]
    fn test_from_candles_dedupes_open_time() {
        let series =
            SymbolSeries::from_candles("BTCUSDT", vec![candle_at(1, 1.0), candle_at(1, 9.0)]);
        assert_eq!(series.len(), 1);
        // First occurrence wins
        assert!((series.candles()[0].close - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_series() {
        let series = SymbolSeries::empty("ETHUSDT".to_string());
        assert!(series.is_empty());
        assert_eq!(series.first_open_time(), None);
    }

    #[test]
    fn test_project() {
        let series =
            SymbolSeries::from_candles("BTCUSDT", vec![candle_at(1, 1.0), candle_at(2, 2.0)]);
        let closes: Vec<f64> = series.project(Field::Close).map(|(_, v)| v).collect();
        assert_eq!(closes, vec![1.0, 2.0]);
    }
}
