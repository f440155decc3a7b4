use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, TimestampSecondArray},
    csv::WriterBuilder,
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;

use crate::config::OutputFormat;
use crate::merge::MasterTable;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Arrow layout of the master table: `timestamp` first, then one nullable Float64 per column.
pub fn to_record_batch(master: &MasterTable) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(master.num_columns() + 1);
    fields.push(Field::new(
        TIMESTAMP_COLUMN,
        DataType::Timestamp(TimeUnit::Second, None),
        false,
    ));
    for name in &master.columns {
        fields.push(Field::new(name, DataType::Float64, true));
    }

    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len());
    let seconds: Vec<i64> = master
        .rows
        .keys()
        .map(|ts| ts.and_utc().timestamp())
        .collect();
    arrays.push(Arc::new(TimestampSecondArray::from(seconds)));
    for i in 0..master.num_columns() {
        let values: Float64Array = master.rows.values().map(|row| row[i]).collect();
        arrays.push(Arc::new(values));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building record batch")
}

/// Write the master table to `path`.
///
/// Output goes to a hidden sibling temp file first and is renamed over `path` once
/// complete, so `path` is either untouched or fully written.
pub fn write_master(master: &MasterTable, path: &Path, format: OutputFormat) -> Result<()> {
    let batch = to_record_batch(master)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let tmp_path = temp_path_for(path);

    let written = match format {
        OutputFormat::Csv => write_csv(&batch, &tmp_path),
        OutputFormat::Parquet => write_parquet(&batch, &tmp_path),
    };
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path));
    }
    debug!(path = %path.display(), rows = batch.num_rows(), ?format, "wrote master dataset");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .with_timestamp_format(TIMESTAMP_FORMAT.to_string())
        .build(BufWriter::new(file));
    writer.write(batch).context("writing CSV")?;
    writer
        .into_inner()
        .into_inner()
        .map_err(|e| e.into_error())
        .context("flushing CSV")?;
    Ok(())
}

fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .set_dictionary_enabled(true)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
