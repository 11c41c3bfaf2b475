//! Core types for the candela OHLCV downloader.
//!
//! This crate provides the fundamental data structures used throughout
//! candela:
//!
//! - [`Candle`] - One OHLCV time bucket for one symbol
//! - [`SymbolSeries`] - Ordered candle series for one symbol
//! - [`Field`] - The five OHLCV fields
//! - [`Interval`] - Kline aggregation interval
//! - [`SymbolDescriptor`] / [`ExchangeInfo`] - Exchange metadata snapshot

#![doc(issue_tracker_base_url = "https://github.com/candela-data/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod error;
mod field;
mod interval;
mod symbol;

pub use candle::{Candle, SymbolSeries};
pub use error::{CandelaError, Result};
pub use field::{Field, FieldParseError};
pub use interval::{Interval, IntervalParseError};
pub use symbol::{ExchangeInfo, SymbolDescriptor, SymbolStatus};
