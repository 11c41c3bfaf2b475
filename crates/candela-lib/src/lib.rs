//! Batch downloader for Binance spot OHLCV candles.
//!
//! This is a facade crate that re-exports functionality from the candela
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use candela_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ExchangeClient::new(HttpTransport::with_defaults()?);
//!
//!     let info = client.exchange_info().await?;
//!     let universe = select(&info, &["USDT".to_string()], 25)?;
//!
//!     let report = collect(&client, &universe, &FetchPlan::default(), |_| {}).await;
//!     write(&report.series, std::path::Path::new("storage/ohlcv"), Layout::Wide)?;
//!
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/candela-data/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candela_types::*;

// Re-export symbol universe selection
pub use candela_select::select;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use candela_fetch::{
    BatchReport, ExchangeClient, FetchPlan, FixtureTransport, HttpTransport, Normalized,
    Transport, TransportConfig, TransportError, collect, normalize,
};

// Re-export storage
#[cfg(feature = "store")]
pub use candela_store::{
    FieldSlice, FieldTable, Layout, ValidationRecord, ValidationSummary, Violation, WriteReport,
    check_all, load, stored_symbols, validate, write,
};

/// Prelude module for convenient imports.
///
/// ```
/// use candela_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candela_select::select;
    pub use candela_types::{
        Candle, CandelaError, ExchangeInfo, Field, Interval, Result, SymbolDescriptor,
        SymbolSeries, SymbolStatus,
    };

    #[cfg(feature = "fetch")]
    pub use candela_fetch::{
        BatchReport, ExchangeClient, FetchPlan, FixtureTransport, HttpTransport, Transport,
        TransportConfig, collect, normalize,
    };

    #[cfg(feature = "store")]
    pub use candela_store::{
        FieldSlice, FieldTable, Layout, ValidationSummary, WriteReport, check_all, load,
        stored_symbols, validate, write,
    };
}

#[cfg(all(test, feature = "full"))]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    /// Full pipeline over the fixture: select, fetch, write wide, reload.
    #[tokio::test]
    async fn test_fixture_pipeline_round_trip() {
        let client = ExchangeClient::new(FixtureTransport::sample());

        let info = client.exchange_info().await.unwrap();
        let universe = select(&info, &["USDT".to_string()], 2).unwrap();

        let plan = FetchPlan {
            rows: 3,
            delay: Duration::ZERO,
            ..Default::default()
        };
        let report = collect(&client, &universe, &plan, |_| {}).await;
        assert_eq!(report.errored(), 0);

        let series = &report.series["BTCUSDT"];
        assert_eq!(series.len(), 3);
        let opens: Vec<_> = series.candles().iter().map(|c| c.open_time).collect();
        assert!(opens[0] < opens[1] && opens[1] < opens[2]);

        let dir = tempfile::tempdir().unwrap();
        write(&report.series, dir.path(), Layout::Wide).unwrap();

        let slice = load(dir.path(), Layout::Wide, "BTCUSDT", Field::Close).unwrap();
        assert_eq!(slice.len(), 3);
        for (loaded, fetched) in slice.values.iter().zip(series.candles()) {
            assert_relative_eq!(*loaded, fetched.close);
        }

        let summary = check_all(dir.path(), Layout::Wide, &universe);
        assert!(summary.all_passed());
    }
}
