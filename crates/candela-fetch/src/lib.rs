//! HTTP client and candle fetching for the candela OHLCV downloader.
//!
//! This crate provides the data download pipeline:
//!
//! - [`Transport`] - The HTTP seam, with live and fixture implementations
//! - [`ExchangeClient`] - Typed exchange metadata and kline requests
//! - [`parse::normalize`] - Raw kline rows into a typed [`candela_types::SymbolSeries`]
//! - [`batch::collect`] - Sequential, rate-limited per-symbol batch loop

#![doc(issue_tracker_base_url = "https://github.com/candela-data/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;
mod client;
pub mod parse;
mod transport;

pub use batch::{BatchReport, FetchPlan, collect};
pub use client::ExchangeClient;
pub use parse::{Normalized, normalize};
pub use transport::{FixtureTransport, HttpTransport, Transport, TransportConfig, TransportError};
