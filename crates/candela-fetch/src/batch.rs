//! Sequential, rate-limited batch collection.
//!
//! Symbols are fetched one at a time in universe order with a fixed delay
//! between consecutive requests, so a run never exceeds the upstream rate
//! budget regardless of universe size. A failure on one symbol is recorded
//! and the loop continues; partial success is the expected steady state.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use candela_types::{CandelaError, Interval, Result, SymbolSeries};

use crate::client::ExchangeClient;
use crate::parse::normalize;
use crate::transport::Transport;

/// What one batch run should fetch.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    /// Kline interval.
    pub interval: Interval,
    /// Maximum rows per kline request (one page).
    pub rows: usize,
    /// Inclusive start of the requested window.
    pub start: Option<NaiveDate>,
    /// Inclusive end of the requested window.
    pub end: Option<NaiveDate>,
    /// Minimum delay between consecutive kline requests.
    pub delay: Duration,
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self {
            interval: Interval::Day1,
            rows: 1000,
            start: None,
            end: None,
            delay: Duration::from_millis(200),
        }
    }
}

impl FetchPlan {
    /// Returns the start of the window as a millisecond epoch.
    #[must_use]
    pub fn start_ms(&self) -> Option<i64> {
        self.start
            .map(|d| d.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc().timestamp_millis())
    }

    /// Returns the end of the window as a millisecond epoch (end of day).
    #[must_use]
    pub fn end_ms(&self) -> Option<i64> {
        self.end.map(|d| {
            d.and_hms_opt(23, 59, 59)
                .expect("end of day is valid")
                .and_utc()
                .timestamp_millis()
        })
    }
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Successfully fetched series, keyed by symbol.
    pub series: BTreeMap<String, SymbolSeries>,
    /// Per-symbol failure reasons, keyed by symbol.
    pub errors: BTreeMap<String, String>,
    /// Total raw rows dropped during normalization.
    pub dropped_rows: usize,
    /// Total numeric cells coerced to missing during normalization.
    pub coerced_cells: usize,
}

impl BatchReport {
    /// Number of symbols that produced data.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.series.len()
    }

    /// Number of symbols that failed or returned no data.
    #[must_use]
    pub fn errored(&self) -> usize {
        self.errors.len()
    }

    /// Total candles across all fetched series.
    #[must_use]
    pub fn total_candles(&self) -> usize {
        self.series.values().map(SymbolSeries::len).sum()
    }
}

/// Fetches every kline row for one symbol's window, paging as needed.
///
/// Without a start date a single request returns the most recent rows. With
/// one, requests of `plan.rows` are issued from the start of the window until
/// the end (today when unset) is reached or a short page signals exhaustion,
/// sleeping `plan.delay` between pages.
async fn fetch_window<T: Transport>(
    client: &ExchangeClient<T>,
    symbol: &str,
    plan: &FetchPlan,
) -> Result<Vec<Value>> {
    let Some(start) = plan.start_ms() else {
        return client
            .klines(symbol, plan.interval, plan.rows, None, plan.end_ms())
            .await;
    };

    let step = plan.interval.milliseconds() as i64;
    let end = plan.end_ms().unwrap_or_else(|| Utc::now().timestamp_millis());
    let mut cursor = start;
    let mut rows = Vec::new();

    loop {
        let page = client
            .klines(symbol, plan.interval, plan.rows, Some(cursor), Some(end))
            .await?;
        let page_len = page.len();
        let last_open = page.last().and_then(|r| r.get(0)).and_then(Value::as_i64);
        rows.extend(page);

        let Some(last_open) = last_open else { break };
        if page_len < plan.rows || last_open + step > end {
            break;
        }
        cursor = last_open + step;
        if !plan.delay.is_zero() {
            tokio::time::sleep(plan.delay).await;
        }
    }

    Ok(rows)
}

/// Fetches and normalizes candles for each symbol in order.
///
/// Sleeps `plan.delay` between consecutive requests (not before the first).
/// Per-symbol transport failures, parse failures, and empty responses are
/// recorded in the report and never abort the loop; `on_symbol` is invoked
/// once per symbol after its fetch completes, for progress reporting.
pub async fn collect<T: Transport>(
    client: &ExchangeClient<T>,
    symbols: &[String],
    plan: &FetchPlan,
    mut on_symbol: impl FnMut(&str),
) -> BatchReport {
    let mut report = BatchReport::default();

    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 && !plan.delay.is_zero() {
            tokio::time::sleep(plan.delay).await;
        }

        match fetch_window(client, symbol, plan).await {
            Ok(rows) => {
                let normalized = normalize(&rows, symbol);
                report.dropped_rows += normalized.dropped_rows;
                report.coerced_cells += normalized.coerced_cells;
                if normalized.is_empty() {
                    let err = CandelaError::EmptyData(symbol.clone());
                    report.errors.insert(symbol.clone(), err.to_string());
                } else {
                    report.series.insert(symbol.clone(), normalized.series);
                }
            }
            Err(err) => {
                report.errors.insert(symbol.clone(), err.to_string());
            }
        }

        on_symbol(symbol);
    }

    report
}
