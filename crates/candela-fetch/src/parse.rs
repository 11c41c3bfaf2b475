//! Normalization of raw kline rows into typed candle series.
//!
//! A raw row is a 12-element fixed-order array:
//! `[openTime(ms), open, high, low, close, volume, closeTime(ms),
//! quoteAssetVolume, numTrades, takerBaseVolume, takerQuoteVolume, ignore]`.
//! Prices and volume arrive as decimal strings; only elements 0-6 are used.
//!
//! A numeric cell that does not parse is coerced to NaN, the in-memory
//! missing marker, and counted; the rest of the row is kept. Storage maps
//! NaN to a null cell. A whole row is dropped only when it is structurally
//! short, a timestamp is invalid, or its parsed close is non-positive.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use candela_types::{Candle, SymbolSeries};

/// Result of normalizing one symbol's raw rows.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The typed series, ordered by open time with duplicates removed.
    pub series: SymbolSeries,
    /// Number of raw rows dropped (short, bad timestamp, non-positive close).
    pub dropped_rows: usize,
    /// Number of numeric cells coerced to missing.
    pub coerced_cells: usize,
}

impl Normalized {
    /// Returns true if normalization produced no candles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Normalizes raw kline rows for one symbol.
///
/// Empty input yields an empty series, which callers treat as "symbol had no
/// data" rather than a failure.
#[must_use]
pub fn normalize(rows: &[Value], symbol: &str) -> Normalized {
    let mut candles = Vec::with_capacity(rows.len());
    let mut dropped_rows = 0usize;
    let mut coerced_cells = 0usize;

    for row in rows {
        match candle_from_row(row) {
            Some((candle, coerced)) => {
                candles.push(candle);
                coerced_cells += coerced;
            }
            None => dropped_rows += 1,
        }
    }

    Normalized {
        series: SymbolSeries::from_candles(symbol, candles),
        dropped_rows,
        coerced_cells,
    }
}

/// Decodes one raw row, returning the candle and how many cells were coerced.
///
/// Returns `None` for rows that cannot be represented at all: fewer than
/// seven elements, an invalid timestamp, or a parsed close that is
/// non-positive. A close coerced to missing is kept; it cannot violate the
/// price invariant.
fn candle_from_row(row: &Value) -> Option<(Candle, usize)> {
    let row = row.as_array()?;
    if row.len() < 7 {
        return None;
    }

    let open_time = epoch_ms(&row[0])?;
    let close_time = epoch_ms(&row[6])?;

    let mut coerced = 0usize;
    let mut cell = |value: &Value| {
        number(value).unwrap_or_else(|| {
            coerced += 1;
            f64::NAN
        })
    };
    let open = cell(&row[1]);
    let high = cell(&row[2]);
    let low = cell(&row[3]);
    let close = cell(&row[4]);
    let volume = cell(&row[5]);

    // NaN compares false, so a coerced close is kept
    if close <= 0.0 {
        return None;
    }

    Some((
        Candle::new(open_time, open, high, low, close, volume, close_time),
        coerced,
    ))
}

/// Parses a millisecond epoch into a UTC timestamp.
fn epoch_ms(value: &Value) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value.as_i64()?).single()
}

/// Parses a numeric field that may arrive as a string or a JSON number.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok().filter(|f: &f64| f.is_finite()),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
