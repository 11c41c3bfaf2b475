//! Reloading persisted slices and sanity-checking them.
//!
//! Validation is post-hoc and non-fatal: every check runs independently,
//! violations are accumulated and summarized, and nothing is repaired or
//! deleted. This covers files written by older runs or other tools in
//! addition to freshly written data.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use candela_types::{CandelaError, Field, Result};

use crate::layout::Layout;
use crate::parquet::decode_file;

/// One reloaded (symbol, field) column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlice {
    /// The symbol this slice belongs to.
    pub symbol: String,
    /// The field this slice holds.
    pub field: Field,
    /// Timestamps of the present rows.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Values aligned with `timestamps`; sparse rows are skipped on load.
    pub values: Vec<f64>,
}

impl FieldSlice {
    /// Number of present rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the slice holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the smallest value, if any.
    #[must_use]
    pub fn min_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }
}

/// Loads one (symbol, field) slice from storage.
///
/// For the narrow layout this reads the per-symbol file; for the wide layout
/// it reads the per-field file and projects the symbol column, skipping rows
/// where the symbol has no value.
///
/// # Errors
///
/// Returns [`CandelaError::NotFound`] if the expected file is absent, or a
/// parquet error if the symbol column is missing from a wide file.
pub fn load(root: &Path, layout: Layout, symbol: &str, field: Field) -> Result<FieldSlice> {
    let path = layout.data_path(root, field, symbol);
    let decoded = decode_file(&path)?;

    let wanted = match layout {
        Layout::Narrow => field.as_str().to_string(),
        Layout::Wide => symbol.to_string(),
    };
    let column = decoded
        .columns
        .iter()
        .find(|(name, _)| *name == wanted)
        .ok_or_else(|| {
            CandelaError::Parquet(format!("column '{wanted}' missing from {}", path.display()))
        })?;

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (ts, value) in decoded.timestamps.iter().zip(&column.1) {
        if let Some(v) = value {
            timestamps.push(*ts);
            values.push(*v);
        }
    }

    Ok(FieldSlice {
        symbol: symbol.to_string(),
        field,
        timestamps,
        values,
    })
}

/// One failed sanity check. Violations are reported, never raised.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    /// The slice holds no rows.
    #[error("data is empty")]
    Empty,

    /// A price field contains a non-positive value.
    #[error("contains non-positive values (min = {min})")]
    NonPositivePrice {
        /// The smallest value found.
        min: f64,
    },

    /// The volume field contains a negative value.
    #[error("contains negative values (min = {min})")]
    NegativeVolume {
        /// The smallest value found.
        min: f64,
    },
}

/// Runs every sanity check against one slice.
///
/// Checks are independent; all violations are returned, not just the first.
#[must_use]
pub fn validate(slice: &FieldSlice) -> Vec<Violation> {
    let mut violations = Vec::new();

    if slice.is_empty() {
        violations.push(Violation::Empty);
    }

    if let Some(min) = slice.min_value() {
        if slice.field.is_price() && min <= 0.0 {
            violations.push(Violation::NonPositivePrice { min });
        }
        if slice.field == Field::Volume && min < 0.0 {
            violations.push(Violation::NegativeVolume { min });
        }
    }

    violations
}

/// One violation (or load failure) attributed to a (symbol, field) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRecord {
    /// The symbol checked.
    pub symbol: String,
    /// The field checked.
    pub field: Field,
    /// Human-readable description of what failed.
    pub message: String,
}

impl std::fmt::Display for ValidationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.symbol, self.field, self.message)
    }
}

/// Outcome of checking every (symbol, field) pair of a run.
#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    /// Number of (symbol, field) pairs checked.
    pub checked: usize,
    /// Number of pairs that loaded and passed every check.
    pub passed: usize,
    /// Per-pair failure details.
    pub records: Vec<ValidationRecord>,
}

impl ValidationSummary {
    /// Returns true if every checked pair passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reloads and validates all five fields for each symbol.
///
/// A pair that fails to load (missing file, missing column) contributes a
/// record with the load error; a pair that loads contributes one record per
/// violation. Nothing aborts early.
#[must_use]
pub fn check_all(root: &Path, layout: Layout, symbols: &[String]) -> ValidationSummary {
    let mut summary = ValidationSummary::default();

    for symbol in symbols {
        for &field in Field::all() {
            summary.checked += 1;
            match load(root, layout, symbol, field) {
                Ok(slice) => {
                    let violations = validate(&slice);
                    if violations.is_empty() {
                        summary.passed += 1;
                    } else {
                        for violation in violations {
                            summary.records.push(ValidationRecord {
                                symbol: symbol.clone(),
                                field,
                                message: violation.to_string(),
                            });
                        }
                    }
                }
                Err(err) => {
                    summary.records.push(ValidationRecord {
                        symbol: symbol.clone(),
                        field,
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    summary
}

/// Discovers which symbols a previous run persisted under `root`.
///
/// For the narrow layout this lists the per-symbol files in the `close`
/// directory; for the wide layout it reads the column names of the wide
/// `close` file. Returned symbols are sorted.
///
/// # Errors
///
/// Returns [`CandelaError::NotFound`] if nothing has been written yet.
pub fn stored_symbols(root: &Path, layout: Layout) -> Result<Vec<String>> {
    let probe_field = Field::Close;
    let mut symbols = match layout {
        Layout::Wide => {
            let decoded = decode_file(&layout.wide_path(root, probe_field))?;
            decoded.columns.into_iter().map(|(name, _)| name).collect()
        }
        Layout::Narrow => {
            let dir = layout.field_dir(root, probe_field);
            if !dir.exists() {
                return Err(CandelaError::NotFound { path: dir });
            }
            let mut found = Vec::new();
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension().is_some_and(|ext| ext == "parquet")
                    && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                {
                    found.push(stem.to_string());
                }
            }
            found
        }
    };
    symbols.sort();
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::write;
    use approx::assert_relative_eq;
    use candela_types::{Candle, SymbolSeries};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn slice(field: Field, values: &[f64]) -> FieldSlice {
        FieldSlice {
            symbol: "BTCUSDT".to_string(),
            field,
            timestamps: (1..=values.len() as u32).map(ts).collect(),
            values: values.to_vec(),
        }
    }

    fn sample_map(closes: &[f64]) -> BTreeMap<String, SymbolSeries> {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(ts(i as u32 + 1), c - 0.5, c + 1.0, c - 1.0, c, 50.0, ts(i as u32 + 1)))
            .collect();
        let mut map = BTreeMap::new();
        map.insert(
            "BTCUSDT".to_string(),
            SymbolSeries::from_candles("BTCUSDT", candles),
        );
        map
    }

    #[test]
    fn test_validate_clean_slice() {
        assert!(validate(&slice(Field::Close, &[1.0, 2.0])).is_empty());
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(validate(&slice(Field::Close, &[])), vec![Violation::Empty]);
    }

    #[test]
    fn test_validate_non_positive_price() {
        let violations = validate(&slice(Field::Low, &[5.0, 0.0, 3.0]));
        assert_eq!(violations, vec![Violation::NonPositivePrice { min: 0.0 }]);
    }

    #[test]
    fn test_validate_volume_allows_zero_but_not_negative() {
        assert!(validate(&slice(Field::Volume, &[0.0, 1.0])).is_empty());
        let violations = validate(&slice(Field::Volume, &[1.0, -2.0]));
        assert_eq!(violations, vec![Violation::NegativeVolume { min: -2.0 }]);
    }

    #[test]
    fn test_round_trip_narrow() {
        let dir = tempfile::tempdir().unwrap();
        let map = sample_map(&[10.0, 11.0, 12.0]);
        write(&map, dir.path(), Layout::Narrow).unwrap();

        let slice = load(dir.path(), Layout::Narrow, "BTCUSDT", Field::Close).unwrap();
        assert_eq!(slice.len(), 3);
        assert_relative_eq!(slice.values[0], 10.0);
        assert_relative_eq!(slice.values[2], 12.0);
        assert_eq!(slice.timestamps[0], ts(1));
    }

    #[test]
    fn test_round_trip_wide() {
        let dir = tempfile::tempdir().unwrap();
        let map = sample_map(&[10.0, 11.0, 12.0]);
        write(&map, dir.path(), Layout::Wide).unwrap();

        let slice = load(dir.path(), Layout::Wide, "BTCUSDT", Field::Volume).unwrap();
        assert_eq!(slice.len(), 3);
        assert_relative_eq!(slice.values[1], 50.0);
    }

    #[test]
    fn test_coerced_cell_skipped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let candles = vec![
            Candle::new(ts(1), 1.0, 2.0, 0.5, 10.0, 50.0, ts(1)),
            Candle::new(ts(2), f64::NAN, 2.0, 0.5, 11.0, 50.0, ts(2)),
        ];
        let mut map = BTreeMap::new();
        map.insert(
            "BTCUSDT".to_string(),
            SymbolSeries::from_candles("BTCUSDT", candles),
        );
        write(&map, dir.path(), Layout::Narrow).unwrap();

        // The missing open cell is absent from the slice, not zero or NaN
        let opens = load(dir.path(), Layout::Narrow, "BTCUSDT", Field::Open).unwrap();
        assert_eq!(opens.len(), 1);
        assert_eq!(opens.timestamps, vec![ts(1)]);
        assert_relative_eq!(opens.values[0], 1.0);

        let closes = load(dir.path(), Layout::Narrow, "BTCUSDT", Field::Close).unwrap();
        assert_eq!(closes.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path(), Layout::Narrow, "BTCUSDT", Field::Close);
        assert!(matches!(result, Err(CandelaError::NotFound { .. })));
    }

    #[test]
    fn test_load_missing_wide_column() {
        let dir = tempfile::tempdir().unwrap();
        write(&sample_map(&[10.0]), dir.path(), Layout::Wide).unwrap();

        let result = load(dir.path(), Layout::Wide, "DOGEUSDT", Field::Close);
        assert!(matches!(result, Err(CandelaError::Parquet(_))));
    }

    #[test]
    fn test_check_all_counts_pairs() {
        let dir = tempfile::tempdir().unwrap();
        write(&sample_map(&[10.0, 11.0]), dir.path(), Layout::Narrow).unwrap();

        let summary = check_all(dir.path(), Layout::Narrow, &["BTCUSDT".to_string()]);
        assert_eq!(summary.checked, 5);
        assert_eq!(summary.passed, 5);
        assert!(summary.all_passed());
    }

    #[test]
    fn test_check_all_reports_violation_for_affected_field_only() {
        let dir = tempfile::tempdir().unwrap();
        // close = 0 survives writing here by constructing the candle directly
        let mut map = BTreeMap::new();
        let candles = vec![Candle::new(ts(1), 1.0, 2.0, 0.5, 0.0, 10.0, ts(1))];
        map.insert(
            "BTCUSDT".to_string(),
            SymbolSeries::from_candles("BTCUSDT", candles),
        );
        write(&map, dir.path(), Layout::Narrow).unwrap();

        let summary = check_all(dir.path(), Layout::Narrow, &["BTCUSDT".to_string()]);
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.records[0].field, Field::Close);
        assert_eq!(summary.passed, 4);
    }

    #[test]
    fn test_stored_symbols_both_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let map = sample_map(&[10.0]);

        write(&map, dir.path(), Layout::Narrow).unwrap();
        assert_eq!(
            stored_symbols(dir.path(), Layout::Narrow).unwrap(),
            vec!["BTCUSDT"]
        );

        write(&map, dir.path(), Layout::Wide).unwrap();
        assert_eq!(
            stored_symbols(dir.path(), Layout::Wide).unwrap(),
            vec!["BTCUSDT"]
        );
    }

    #[test]
    fn test_stored_symbols_nothing_written() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            stored_symbols(dir.path(), Layout::Wide),
            Err(CandelaError::NotFound { .. })
        ));
    }

    #[test]
    fn test_check_all_records_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let summary = check_all(dir.path(), Layout::Narrow, &["BTCUSDT".to_string()]);
        assert_eq!(summary.checked, 5);
        assert_eq!(summary.passed, 0);
        assert_eq!(summary.records.len(), 5);
        assert!(summary.records[0].message.contains("not found"));
    }
}
