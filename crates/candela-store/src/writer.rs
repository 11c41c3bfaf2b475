//! Persisting a run's series to disk.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use candela_types::{Field, Result, SymbolSeries};

use crate::layout::Layout;
use crate::parquet::{encode_narrow, encode_wide};
use crate::table::FieldTable;

/// What one write pass put on disk.
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    /// Written files with their row counts, in write order.
    pub files: Vec<(PathBuf, usize)>,
}

impl WriteReport {
    /// Number of files written.
    #[must_use]
    pub const fn files_written(&self) -> usize {
        self.files.len()
    }

    /// Total rows across all written files.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|(_, rows)| rows).sum()
    }
}

/// Writes all five field tables for the accumulated series.
///
/// Creates field directories as needed and truncates any existing file at
/// the same path; a later run overwrites, never appends or merges. Writes
/// are not transactional: if one file fails, files already written stay on
/// disk and the error propagates.
///
/// A run that produced no series writes nothing, so a total fetch failure
/// cannot replace a previous run's files with empty ones.
///
/// # Errors
///
/// Returns an error on directory creation, file creation, or encoding
/// failure.
pub fn write(
    all_series: &BTreeMap<String, SymbolSeries>,
    root: &Path,
    layout: Layout,
) -> Result<WriteReport> {
    let mut report = WriteReport::default();
    if all_series.is_empty() {
        return Ok(report);
    }

    for &field in Field::all() {
        fs::create_dir_all(layout.field_dir(root, field))?;

        match layout {
            Layout::Wide => {
                let table = FieldTable::build(field, all_series);
                let path = layout.wide_path(root, field);
                let file = BufWriter::new(File::create(&path)?);
                encode_wide(&table, file)?;
                report.files.push((path, table.num_rows()));
            }
            Layout::Narrow => {
                for (symbol, series) in all_series {
                    let path = layout.data_path(root, field, symbol);
                    let file = BufWriter::new(File::create(&path)?);
                    encode_narrow(series, field, file)?;
                    report.files.push((path, series.len()));
                }
            }
        }
    }

    Ok(report)
}
