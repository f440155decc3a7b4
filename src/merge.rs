// src/merge.rs
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::process::normalize::NormalizedTable;

/// All sources joined on timestamp. Rows are ordered by timestamp (the map is sorted);
/// each row holds one value slot per entry of `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterTable {
    pub columns: Vec<String>,
    pub rows: BTreeMap<NaiveDateTime, Vec<Option<f64>>>,
}

impl MasterTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn value(&self, ts: &NaiveDateTime, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(ts).and_then(|row| row[idx])
    }

    /// Non-missing value count per column, in column order.
    pub fn non_null_counts(&self) -> Vec<usize> {
        (0..self.columns.len())
            .map(|i| self.rows.values().filter(|row| row[i].is_some()).count())
            .collect()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.keys().next().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.keys().next_back().copied()
    }
}

/// Inner-join `tables` on their timestamp keys.
///
/// The result holds exactly the timestamps present in every table, and the union of all
/// columns in first-seen order. When two tables share a column name the later table's
/// values win (logged).
pub fn merge_tables(tables: &[NormalizedTable]) -> Result<MasterTable, PipelineError> {
    let (first, rest) = tables.split_first().ok_or(PipelineError::NoDataAvailable)?;

    let mut common: BTreeSet<NaiveDateTime> = first.rows.keys().copied().collect();
    for table in rest {
        common.retain(|ts| table.rows.contains_key(ts));
    }

    let mut master = MasterTable::default();
    // for each input table, the master slot of each of its columns
    let mut slots: Vec<Vec<usize>> = Vec::with_capacity(tables.len());
    for table in tables {
        let mut table_slots = Vec::with_capacity(table.columns.len());
        for col in &table.columns {
            let slot = match master.columns.iter().position(|c| *c == col.name) {
                Some(slot) => {
                    warn!(
                        column = %col.name,
                        source = %table.source,
                        "column already present in an earlier source, later values win"
                    );
                    slot
                }
                None => {
                    master.columns.push(col.name.clone());
                    master.columns.len() - 1
                }
            };
            table_slots.push(slot);
        }
        slots.push(table_slots);
    }

    for ts in common {
        let mut row = vec![None; master.columns.len()];
        for (table, table_slots) in tables.iter().zip(&slots) {
            if let Some(values) = table.rows.get(&ts) {
                for (&slot, value) in table_slots.iter().zip(values) {
                    row[slot] = *value;
                }
            }
        }
        master.rows.insert(ts, row);
    }

    info!(
        sources = tables.len(),
        rows = master.num_rows(),
        columns = master.num_columns(),
        "merged datasets"
    );
    Ok(master)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::normalize::Column;
    use chrono::NaiveDate;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,smardmerge=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn t(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn table(source: &str, columns: &[&str], rows: &[(u32, Vec<Option<f64>>)]) -> NormalizedTable {
        NormalizedTable {
            source: source.to_string(),
            columns: columns
                .iter()
                .map(|c| Column {
                    name: c.to_string(),
                    raw_header: c.to_string(),
                })
                .collect(),
            rows: rows.iter().map(|(h, v)| (t(*h), v.clone())).collect(),
        }
    }

    #[test]
    fn merge_is_a_strict_intersection() {
        init_test_logging();
        let a = table("a", &["A"], &[(1, vec![Some(1.0)]), (2, vec![Some(2.0)]), (3, vec![Some(3.0)])]);
        let b = table("b", &["B"], &[(2, vec![Some(20.0)]), (3, vec![None]), (4, vec![Some(40.0)])]);

        let master = merge_tables(&[a, b]).unwrap();
        let keys: Vec<_> = master.rows.keys().copied().collect();
        assert_eq!(keys, vec![t(2), t(3)]);
        assert_eq!(master.columns, vec!["A", "B"]);
        assert_eq!(master.value(&t(2), "B"), Some(20.0));
        assert_eq!(master.value(&t(3), "A"), Some(3.0));
        assert_eq!(master.value(&t(3), "B"), None);
        assert_eq!(master.non_null_counts(), vec![2, 1]);
    }

    #[test]
    fn single_table_passes_through() {
        init_test_logging();
        let a = table("a", &["A", "B"], &[(5, vec![Some(1.0), None]), (1, vec![None, Some(2.0)])]);
        let master = merge_tables(&[a]).unwrap();
        assert_eq!(master.num_rows(), 2);
        assert_eq!(master.first_timestamp(), Some(t(1)));
        assert_eq!(master.last_timestamp(), Some(t(5)));
    }

    #[test]
    fn column_collision_is_last_write_wins() {
        init_test_logging();
        let a = table("generation", &["Total", "Other"], &[(1, vec![Some(1.0), Some(5.0)])]);
        let b = table("consumption", &["Total"], &[(1, vec![Some(9.0)])]);
        let master = merge_tables(&[a, b]).unwrap();
        assert_eq!(master.columns, vec!["Total", "Other"]);
        assert_eq!(master.value(&t(1), "Total"), Some(9.0));
        assert_eq!(master.value(&t(1), "Other"), Some(5.0));
    }

    #[test]
    fn empty_input_is_no_data() {
        init_test_logging();
        assert!(matches!(merge_tables(&[]), Err(PipelineError::NoDataAvailable)));
    }

    #[test]
    fn disjoint_tables_give_no_rows() {
        init_test_logging();
        let a = table("a", &["A"], &[(1, vec![Some(1.0)])]);
        let b = table("b", &["B"], &[(2, vec![Some(2.0)])]);
        let master = merge_tables(&[a, b]).unwrap();
        assert_eq!(master.num_rows(), 0);
        assert_eq!(master.columns, vec!["A", "B"]);
    }
}
