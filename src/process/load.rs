// src/process/load.rs
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{fs, path::Path};
use tracing::{debug, warn};

use crate::process::{
    locale::{looks_like_locale_number, parse_locale_str},
    raw_table::{Cell, RawTable},
    utils::{clean_header, clean_str, is_na_token},
};

/// Read a semicolon-delimited export into a [`RawTable`].
///
/// - the first record is the header row
/// - short rows are padded with `Cell::Missing`, longer rows are an error
/// - a column whose every non-missing cell looks like a locale number
///   (`1.234,5`) is loaded as `Cell::Number`, everything else stays `Cell::Text`
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_semicolon_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), "input is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    parse_semicolon_csv(&text).with_context(|| format!("Failed to parse {:?}", path))
}

/// Parse already-decoded semicolon-delimited text. See [`load_semicolon_csv`].
pub fn parse_semicolon_csv(text: &str) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(rec) => rec
            .context("CSV parse error in header row")?
            .iter()
            .map(clean_header)
            .collect(),
        None => bail!("no header row"),
    };
    if headers.iter().all(String::is_empty) {
        bail!("empty header row");
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (idx, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx + 1))?;
        // a trailing blank line comes through as a single empty field
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        if record.len() > headers.len() {
            bail!(
                "record {} has {} fields, header has {}",
                idx + 1,
                record.len(),
                headers.len()
            );
        }
        raw_rows.push(record.iter().map(clean_str).collect());
    }

    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| is_numeric_column(&raw_rows, col))
        .collect();
    debug!(
        columns = headers.len(),
        rows = raw_rows.len(),
        numeric = numeric.iter().filter(|n| **n).count(),
        "loaded table"
    );

    let rows = raw_rows
        .into_iter()
        .map(|fields| {
            (0..headers.len())
                .map(|col| match fields.get(col) {
                    None => Cell::Missing,
                    Some(s) if is_na_token(s) => Cell::Missing,
                    Some(s) if numeric[col] => parse_locale_str(s).map_or(Cell::Missing, Cell::Number),
                    Some(s) => Cell::Text(s.clone()),
                })
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn is_numeric_column(rows: &[Vec<String>], col: usize) -> bool {
    let mut present = rows
        .iter()
        .filter_map(|r| r.get(col))
        .filter(|s| !is_na_token(s))
        .peekable();
    present.peek().is_some() && present.all(|s| looks_like_locale_number(s))
}
