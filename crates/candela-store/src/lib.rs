//! Columnar storage for the candela OHLCV downloader.
//!
//! This crate reshapes per-symbol candle series into one table per OHLCV
//! field and persists them as Parquet:
//!
//! - [`FieldTable`] - Sparse wide table (rows = timestamps, columns = symbols)
//! - [`Layout`] - The two on-disk conventions (wide per field, narrow per
//!   symbol per field)
//! - [`write`] - Persist a run's series under a storage root
//! - [`load`] / [`validate`] - Reload persisted slices and sanity-check them

#![doc(issue_tracker_base_url = "https://github.com/candela-data/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod layout;
mod parquet;
mod table;
mod validate;
mod writer;

pub use layout::Layout;
pub use table::FieldTable;
pub use validate::{
    FieldSlice, ValidationRecord, ValidationSummary, Violation, check_all, load, stored_symbols,
    validate,
};
pub use writer::{WriteReport, write};
