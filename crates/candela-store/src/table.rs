//! Sparse wide field tables.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use candela_types::{Field, SymbolSeries};

/// One field projected across every symbol in a run.
///
/// Rows are the sorted union of all open times seen across the input series;
/// columns are symbols. A symbol that has no candle at a given timestamp
/// holds `None` there — absent means absent, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTable {
    field: Field,
    timestamps: Vec<DateTime<Utc>>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl FieldTable {
    /// Builds the table for one field from all accumulated series.
    ///
    /// Column order follows the map's key order, so identical inputs always
    /// produce an identical table.
    #[must_use]
    pub fn build(field: Field, all_series: &BTreeMap<String, SymbolSeries>) -> Self {
        let mut index: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
        for series in all_series.values() {
            for candle in series.candles() {
                let next = index.len();
                index.entry(candle.open_time).or_insert(next);
            }
        }
        // BTreeMap iteration is sorted; re-number into row positions
        let timestamps: Vec<DateTime<Utc>> = index.keys().copied().collect();
        for (row, entry) in index.values_mut().enumerate() {
            *entry = row;
        }

        let columns = all_series
            .iter()
            .map(|(symbol, series)| {
                let mut values = vec![None; timestamps.len()];
                for (ts, value) in series.project(field) {
                    // NaN marks a coerced cell; store it as missing
                    values[index[&ts]] = (!value.is_nan()).then_some(value);
                }
                (symbol.clone(), values)
            })
            .collect();

        Self {
            field,
            timestamps,
            columns,
        }
    }

    /// Returns the field this table holds.
    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Returns the sorted row timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Returns the symbol columns in order.
    #[must_use]
    pub fn columns(&self) -> &[(String, Vec<Option<f64>>)] {
        &self.columns
    }

    /// Returns one symbol's column, if present.
    #[must_use]
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(name, _)| name == symbol)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns the number of symbol columns.
    #[must_use]
    pub const fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_types::Candle;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn candle(day: u32, close: f64) -> Candle {
        Candle::new(ts(day), close, close, close, close, 10.0, ts(day))
    }

    fn series_map(entries: &[(&str, &[(u32, f64)])]) -> BTreeMap<String, SymbolSeries> {
        entries
            .iter()
            .map(|(symbol, rows)| {
                let candles = rows.iter().map(|&(d, c)| candle(d, c)).collect();
                ((*symbol).to_string(), SymbolSeries::from_candles(*symbol, candles))
            })
            .collect()
    }

    #[test]
    fn test_build_unions_timestamps() {
        let map = series_map(&[
            ("BTCUSDT", &[(1, 1.0), (2, 2.0)]),
            ("ETHUSDT", &[(2, 20.0), (3, 30.0)]),
        ]);
        let table = FieldTable::build(Field::Close, &map);

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.timestamps(), &[ts(1), ts(2), ts(3)]);
    }

    #[test]
    fn test_missing_cells_are_absent_not_zero() {
        let map = series_map(&[
            ("BTCUSDT", &[(1, 1.0), (2, 2.0)]),
            ("ETHUSDT", &[(2, 20.0), (3, 30.0)]),
        ]);
        let table = FieldTable::build(Field::Close, &map);

        assert_eq!(table.column("BTCUSDT").unwrap(), &[Some(1.0), Some(2.0), None]);
        assert_eq!(table.column("ETHUSDT").unwrap(), &[None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_column_values_in_timestamp_order() {
        let map = series_map(&[("BTCUSDT", &[(3, 3.0), (1, 1.0), (2, 2.0)])]);
        let table = FieldTable::build(Field::Close, &map);
        assert_eq!(
            table.column("BTCUSDT").unwrap(),
            &[Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_nan_cell_becomes_missing() {
        let candles = vec![candle(1, 1.0), candle(2, f64::NAN), candle(3, 3.0)];
        let mut map = BTreeMap::new();
        map.insert(
            "BTCUSDT".to_string(),
            SymbolSeries::from_candles("BTCUSDT", candles),
        );
        let table = FieldTable::build(Field::Close, &map);

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column("BTCUSDT").unwrap(), &[Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_empty_input() {
        let table = FieldTable::build(Field::Open, &BTreeMap::new());
        assert!(table.is_empty());
        assert_eq!(table.num_columns(), 0);
    }

    #[test]
    fn test_unknown_column() {
        let map = series_map(&[("BTCUSDT", &[(1, 1.0)])]);
        let table = FieldTable::build(Field::Close, &map);
        assert!(table.column("DOGEUSDT").is_none());
    }
}
