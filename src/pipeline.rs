// src/pipeline.rs
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::{
    config::{PipelineConfig, Source},
    error::PipelineError,
    merge::merge_tables,
    output::write_master,
    process::{load::load_semicolon_csv, normalize::normalize, normalize::NormalizedTable},
};

pub const DAY_AHEAD_PRICE: &str = "Day_Ahead_Price";

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
    pub non_null: Vec<usize>,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    /// Sources that contributed a table, in processing order.
    pub sources: Vec<&'static str>,
}

/// Load and normalize one source file.
pub fn load_source(source: Source, path: &Path) -> Result<NormalizedTable, PipelineError> {
    info!(source = source.name(), path = %path.display(), "processing");
    let raw = load_semicolon_csv(path).map_err(|e| PipelineError::LoadFailure {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(normalize(source.name(), &raw))
}

/// Name the price column `Day_Ahead_Price`.
///
/// The first column whose raw header mentions "Deutschland" or "€" is renamed; failing
/// that, a table with exactly one column has that column renamed.
pub fn rename_price_column(table: &mut NormalizedTable) {
    let by_header = table
        .columns
        .iter()
        .position(|c| c.raw_header.contains("Deutschland") || c.raw_header.contains('€'));
    match by_header {
        Some(idx) => table.rename_column(idx, DAY_AHEAD_PRICE),
        None if table.columns.len() == 1 => table.rename_column(0, DAY_AHEAD_PRICE),
        None => warn!(
            columns = ?table.column_names(),
            "no price column recognised, keeping names"
        ),
    }
}

/// Generation, consumption and prices → one timestamp-aligned dataset at `config.output`.
///
/// A source that fails to load, or that normalizes to no rows, is skipped; the
/// remaining ones are still merged. With no usable source the output file is not
/// touched and [`PipelineError::NoDataAvailable`] is returned.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary, PipelineError> {
    let mut tables = Vec::with_capacity(Source::ALL.len());
    let mut used = Vec::with_capacity(Source::ALL.len());

    for source in Source::ALL {
        let mut table = match load_source(source, config.path_for(source)) {
            Ok(table) => table,
            Err(e) => {
                error!(source = source.name(), "{}", e);
                continue;
            }
        };
        if table.is_empty() {
            warn!(source = source.name(), "no usable rows, treating source as absent");
            continue;
        }
        if source == Source::Prices {
            rename_price_column(&mut table);
        }
        tables.push(table);
        used.push(source.name());
    }

    if tables.is_empty() {
        error!("no data processed");
        return Err(PipelineError::NoDataAvailable);
    }

    info!("merging datasets");
    let master = merge_tables(&tables)?;

    write_master(&master, &config.output, config.format).map_err(|e| PipelineError::Output {
        path: config.output.clone(),
        source: e,
    })?;
    info!(path = %config.output.display(), "saved master dataset");

    Ok(PipelineSummary {
        output: config.output.clone(),
        rows: master.num_rows(),
        non_null: master.non_null_counts(),
        first: master.first_timestamp(),
        last: master.last_timestamp(),
        columns: master.columns,
        sources: used,
    })
}
