// src/process/normalize.rs
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::process::{
    date_parser::{parse_start_date, parse_timestamp},
    locale::parse_locale_number,
    raw_table::{Cell, RawTable},
};

/// Header aliases of the combined start date + time column.
const START_DATE_ALIASES: &[&str] = &["start date", "start_date"];
const TIMESTAMP_HEADER: &str = "timestamp";

/// A canonical column and the header it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub raw_header: String,
}

/// One source after normalization: rows keyed by timestamp, values aligned with `columns`.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    pub source: String,
    pub columns: Vec<Column>,
    pub rows: BTreeMap<NaiveDateTime, Vec<Option<f64>>>,
}

impl NormalizedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Value of `column` at `ts`; `None` when the row, the column or the value is absent.
    pub fn value(&self, ts: &NaiveDateTime, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c.name == column)?;
        self.rows.get(ts).and_then(|row| row[idx])
    }

    /// Rename column `idx`. Another column already called `name` is dropped, so the
    /// renamed one wins.
    pub fn rename_column(&mut self, idx: usize, name: &str) {
        debug!(source = %self.source, from = %self.columns[idx].name, to = name, "renaming column");
        self.columns[idx].name = name.to_string();

        let clash = self
            .columns
            .iter()
            .enumerate()
            .find(|(i, c)| *i != idx && c.name == name)
            .map(|(i, _)| i);
        if let Some(other) = clash {
            warn!(
                source = %self.source,
                column = name,
                previous = %self.columns[other].raw_header,
                replacement = %self.columns[idx].raw_header,
                "duplicate canonical column, keeping the later one"
            );
            self.columns.remove(other);
            for row in self.rows.values_mut() {
                row.remove(other);
            }
        }
    }
}

/// Raw-header predicate → canonical name. Rules are tried in order, first match wins.
pub struct ColumnRenameRule {
    pub matches: fn(&str) -> bool,
    pub canonical: &'static str,
}

fn mentions_residual(header: &str) -> bool {
    header.to_lowercase().contains("residual")
}

fn mentions_grid_load(header: &str) -> bool {
    let h = header.to_lowercase();
    h.contains("grid load") || h.contains("grid_load")
}

pub const RENAME_RULES: &[ColumnRenameRule] = &[
    ColumnRenameRule {
        matches: mentions_residual,
        canonical: "Residual_Load",
    },
    ColumnRenameRule {
        matches: mentions_grid_load,
        canonical: "Grid_Load",
    },
];

/// `"Total [MWh] Calculated resolutions"` → `"Total"`.
pub fn generic_cleanup(header: &str) -> String {
    header
        .split('[')
        .next()
        .unwrap_or_default()
        .trim()
        .replace(' ', "_")
}

/// Canonical name for a raw header: first matching rule, else the generic cleanup.
pub fn canonical_name(header: &str) -> String {
    RENAME_RULES
        .iter()
        .find(|rule| (rule.matches)(header))
        .map(|rule| rule.canonical.to_string())
        .unwrap_or_else(|| generic_cleanup(header))
}

fn is_date_like(header: &str) -> bool {
    let h = header.to_lowercase();
    h.contains("date") || h.contains("timestamp")
}

enum TimestampColumn {
    StartDate(usize),
    Iso(usize),
}

fn header_position(raw: &RawTable, pred: impl Fn(&str) -> bool) -> Option<usize> {
    raw.headers.iter().position(|h| pred(h.trim()))
}

fn find_timestamp_column(raw: &RawTable) -> Option<TimestampColumn> {
    header_position(raw, |h| START_DATE_ALIASES.iter().any(|a| h.eq_ignore_ascii_case(a)))
        .map(TimestampColumn::StartDate)
        .or_else(|| {
            header_position(raw, |h| h.eq_ignore_ascii_case(TIMESTAMP_HEADER))
                .map(TimestampColumn::Iso)
        })
}

/// Turn a loaded table into a [`NormalizedTable`].
///
/// 1. find the timestamp column (start-date alias first, then `timestamp`) and parse it;
///    without one the result is empty
/// 2. drop rows whose timestamp does not parse
/// 3. key rows by timestamp and drop every header containing "date" / "timestamp"
/// 4. canonicalize the remaining headers through [`RENAME_RULES`]
/// 5. coerce every cell with the locale number parser
///
/// Duplicate canonical names and duplicate timestamps keep the last one, with a warning.
#[tracing::instrument(level = "debug", skip(raw), fields(rows = raw.rows.len()))]
pub fn normalize(source: &str, raw: &RawTable) -> NormalizedTable {
    let mut table = NormalizedTable {
        source: source.to_string(),
        ..Default::default()
    };

    let (ts_idx, parse): (usize, fn(&str) -> Option<NaiveDateTime>) =
        match find_timestamp_column(raw) {
            Some(TimestampColumn::StartDate(i)) => (i, parse_start_date),
            Some(TimestampColumn::Iso(i)) => (i, parse_timestamp),
            None => {
                warn!(source, headers = ?raw.headers, "no timestamp column");
                return table;
            }
        };

    // Raw column index feeding each canonical column; a later duplicate replaces the source.
    let mut sources: Vec<usize> = Vec::new();
    for (idx, header) in raw.headers.iter().enumerate() {
        if idx == ts_idx || is_date_like(header) {
            continue;
        }
        let name = canonical_name(header);
        match table.columns.iter().position(|c| c.name == name) {
            Some(pos) => {
                warn!(
                    source,
                    column = %name,
                    previous = %table.columns[pos].raw_header,
                    replacement = %header,
                    "duplicate canonical column, keeping the later one"
                );
                table.columns[pos].raw_header = header.clone();
                sources[pos] = idx;
            }
            None => {
                table.columns.push(Column {
                    name,
                    raw_header: header.clone(),
                });
                sources.push(idx);
            }
        }
    }

    let mut dropped = 0usize;
    for row in &raw.rows {
        let ts = match &row[ts_idx] {
            Cell::Text(s) => parse(s),
            _ => None,
        };
        let Some(ts) = ts else {
            dropped += 1;
            continue;
        };
        let values: Vec<Option<f64>> = sources.iter().map(|&i| parse_locale_number(&row[i])).collect();
        if table.rows.insert(ts, values).is_some() {
            warn!(source, timestamp = %ts, "duplicate timestamp, keeping the later row");
        }
    }

    if dropped > 0 {
        warn!(source, dropped, "rows dropped for unparseable timestamps");
    }
    debug!(
        source,
        rows = table.rows.len(),
        columns = ?table.column_names(),
        "normalized"
    );
    table
}
