//! Parquet encode/decode for field tables.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, TimeZone, Utc};
use ::parquet::arrow::ArrowWriter;
use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::basic::Compression;
use ::parquet::file::properties::WriterProperties;

use candela_types::{CandelaError, Field, Result, SymbolSeries};

use crate::table::FieldTable;

/// Row group size for written files.
const ROW_GROUP_SIZE: usize = 100_000;

/// The timestamp column shared by both layouts.
fn timestamp_field() -> ArrowField {
    ArrowField::new(
        "timestamp",
        DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
        false,
    )
}

fn timestamp_array(timestamps: &[DateTime<Utc>]) -> TimestampMicrosecondArray {
    let micros: Vec<i64> = timestamps.iter().map(DateTime::timestamp_micros).collect();
    TimestampMicrosecondArray::from(micros).with_timezone("UTC")
}

fn writer_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(ROW_GROUP_SIZE)
        .build()
}

fn parquet_err(e: impl std::fmt::Display) -> CandelaError {
    CandelaError::Parquet(e.to_string())
}

/// Writes a wide field table: `timestamp` plus one nullable column per symbol.
pub(crate) fn encode_wide<W: Write + Send>(table: &FieldTable, writer: W) -> Result<()> {
    let mut fields = vec![timestamp_field()];
    for (symbol, _) in table.columns() {
        fields.push(ArrowField::new(symbol, DataType::Float64, true));
    }
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<Arc<dyn Array>> = vec![Arc::new(timestamp_array(table.timestamps()))];
    for (_, values) in table.columns() {
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }

    let batch = RecordBatch::try_new(Arc::clone(&schema), arrays).map_err(parquet_err)?;
    let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(writer_props())).map_err(parquet_err)?;
    arrow_writer.write(&batch).map_err(parquet_err)?;
    arrow_writer.close().map_err(parquet_err)?;
    Ok(())
}

/// Writes a narrow per-symbol table: `timestamp` plus the single field column.
///
/// The value column is nullable; a NaN cell in the series is stored as null.
pub(crate) fn encode_narrow<W: Write + Send>(
    series: &SymbolSeries,
    field: Field,
    writer: W,
) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        timestamp_field(),
        ArrowField::new(field.as_str(), DataType::Float64, true),
    ]));

    let (timestamps, values): (Vec<_>, Vec<Option<f64>>) = series
        .project(field)
        .map(|(ts, value)| (ts, (!value.is_nan()).then_some(value)))
        .unzip();
    let arrays: Vec<Arc<dyn Array>> = vec![
        Arc::new(timestamp_array(&timestamps)),
        Arc::new(Float64Array::from(values)),
    ];

    let batch = RecordBatch::try_new(Arc::clone(&schema), arrays).map_err(parquet_err)?;
    let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(writer_props())).map_err(parquet_err)?;
    arrow_writer.write(&batch).map_err(parquet_err)?;
    arrow_writer.close().map_err(parquet_err)?;
    Ok(())
}

/// A decoded Parquet file: the timestamp index plus every value column.
#[derive(Debug, Clone)]
pub(crate) struct Decoded {
    pub(crate) timestamps: Vec<DateTime<Utc>>,
    pub(crate) columns: Vec<(String, Vec<Option<f64>>)>,
}

/// Reads back a file written by either layout.
///
/// The first column must be the microsecond timestamp index; every other
/// column is read as nullable Float64.
pub(crate) fn decode_file(path: &Path) -> Result<Decoded> {
    if !path.exists() {
        return Err(CandelaError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(parquet_err)?
        .build()
        .map_err(parquet_err)?;

    let mut timestamps = Vec::new();
    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::new();

    for batch in reader {
        let batch = batch.map_err(parquet_err)?;
        let schema = batch.schema();

        if columns.is_empty() {
            for field in schema.fields().iter().skip(1) {
                columns.push((field.name().clone(), Vec::new()));
            }
        }

        let ts = batch
            .column(0)
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
            .ok_or_else(|| parquet_err(format!("{}: first column is not a timestamp", path.display())))?;
        for i in 0..ts.len() {
            let instant = Utc
                .timestamp_micros(ts.value(i))
                .single()
                .ok_or_else(|| parquet_err("timestamp out of range"))?;
            timestamps.push(instant);
        }

        for (col_idx, (name, values)) in columns.iter_mut().enumerate() {
            let array = batch
                .column(col_idx + 1)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| parquet_err(format!("column {name} is not Float64")))?;
            for i in 0..array.len() {
                values.push(if array.is_null(i) { None } else { Some(array.value(i)) });
            }
        }
    }

    Ok(Decoded {
        timestamps,
        columns,
    })
}
