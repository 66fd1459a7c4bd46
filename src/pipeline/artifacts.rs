//! Tabular artifacts of a run: control summary, row-level results, clean subset.
use super::validator::ValidationRun;
use crate::audit::RUN_TIME_FORMAT;
use crate::error::{QualityError, Result};
use crate::report::{CleanRow, CONTROL_SUMMARY_HEADER};
use crate::store::{write_table, Batch};
use crate::validation::RuleKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Predefined column sets for the clean subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSet {
    /// The input columns only.
    Input,
    /// The input columns plus `parsed_date`, the rule flags and `row_status`.
    Annotated,
}

/// Which columns the clean subset is written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanColumns {
    Set(ColumnSet),
    /// Explicit column names, taken from the annotated table, in this order.
    Projection(Vec<String>),
}

impl Default for CleanColumns {
    fn default() -> Self {
        CleanColumns::Set(ColumnSet::Input)
    }
}

pub const PARSED_DATE_COLUMN: &str = "parsed_date";
pub const ROW_STATUS_COLUMN: &str = "row_status";

/// The batch with everything the validator derived for each record, as text.
pub struct AnnotatedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    input_width: usize,
}

impl AnnotatedTable {
    pub fn build(batch: &Batch, run: &ValidationRun) -> Self {
        let mut header: Vec<String> = batch.columns().to_vec();
        header.push(PARSED_DATE_COLUMN.to_string());
        header.extend(RuleKind::ALL.iter().map(|r| r.flag_column().to_string()));
        header.push(ROW_STATUS_COLUMN.to_string());

        let rows = batch
            .records()
            .iter()
            .zip(&run.fields)
            .zip(&run.verdicts)
            .map(|((record, fields), verdict)| {
                let mut row: Vec<String> =
                    record.cells.iter().map(|c| c.clone().unwrap_or_default()).collect();
                row.push(
                    fields
                        .parsed_date
                        .valid()
                        .map(|ts| ts.format(RUN_TIME_FORMAT).to_string())
                        .unwrap_or_default(),
                );
                row.extend(verdict.flags.iter().map(|f| f.to_string()));
                row.push(verdict.status.to_string());
                row
            })
            .collect();

        Self { header, rows, input_width: batch.columns().len() }
    }

    /// Column positions for the clean subset. Fails on unknown projection names.
    pub fn resolve(&self, columns: &CleanColumns) -> Result<Vec<usize>> {
        match columns {
            CleanColumns::Set(ColumnSet::Input) => Ok((0..self.input_width).collect()),
            CleanColumns::Set(ColumnSet::Annotated) => Ok((0..self.header.len()).collect()),
            CleanColumns::Projection(names) => names
                .iter()
                .map(|name| {
                    self.header
                        .iter()
                        .position(|h| h == name)
                        .ok_or_else(|| QualityError::MissingColumn { column: name.clone() })
                })
                .collect(),
        }
    }

    fn header_refs(&self, indices: &[usize]) -> Vec<&str> {
        indices.iter().map(|&i| self.header[i].as_str()).collect()
    }
}

pub fn write_control_summary(path: &Path, run: &ValidationRun) -> Result<()> {
    write_table(path, &CONTROL_SUMMARY_HEADER, run.summary.control_rows())
}

pub fn write_row_results(path: &Path, table: &AnnotatedTable) -> Result<()> {
    let all: Vec<usize> = (0..table.header.len()).collect();
    write_table(path, &table.header_refs(&all), &table.rows)
}

/// Writes the `clean` records, in their given order, with the columns at
/// `indices`.
pub fn write_clean_subset(
    path: &Path,
    table: &AnnotatedTable,
    clean: &[CleanRow<'_>],
    indices: &[usize],
) -> Result<()> {
    let rows = clean.iter().map(|c| {
        let row = &table.rows[c.record.id.index()];
        indices.iter().map(move |&i| row[i].as_str())
    });
    write_table(path, &table.header_refs(indices), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Validator;
    use chrono::NaiveDate;

    fn validated() -> (Batch, ValidationRun) {
        let batch = Batch::from_rows(
            &["txn_id", "amount", "date", "country", "customer_id", "memo"],
            &[
                vec![Some("A"), Some("10"), Some("2024-01-01"), Some("US"), Some("C1"), None],
                vec![Some("B"), Some("-3"), Some("oops"), Some("US"), Some("C2"), Some("x")],
            ],
        )
        .unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let run = Validator::default().validate(&batch, now);
        (batch, run)
    }

    fn table() -> AnnotatedTable {
        let (batch, run) = validated();
        AnnotatedTable::build(&batch, &run)
    }

    #[test]
    fn test_annotated_header_order() {
        let t = table();
        assert_eq!(
            t.header[6..],
            [
                "parsed_date",
                "missing_value_fail",
                "negative_amount_fail",
                "duplicate_txn_fail",
                "invalid_date_fail",
                "future_date_fail",
                "row_status"
            ]
        );
    }

    #[test]
    fn test_annotated_rows() {
        let t = table();
        // memo is null, so the missing-value flag fires
        assert_eq!(
            t.rows[0],
            vec!["A", "10", "2024-01-01", "US", "C1", "", "2024-01-01 00:00:00", "true", "false", "false", "false", "false", "FAIL"]
        );
        assert_eq!(t.rows[1][6], "");
        assert_eq!(t.rows[1][12], "FAIL");
    }

    #[test]
    fn test_resolve_projection() {
        let t = table();
        let cols = CleanColumns::Projection(vec!["row_status".into(), "txn_id".into()]);
        assert_eq!(t.resolve(&cols).unwrap(), vec![12, 0]);
        assert_eq!(t.resolve(&CleanColumns::default()).unwrap(), (0..6).collect::<Vec<_>>());

        let bad = CleanColumns::Projection(vec!["nope".into()]);
        assert!(matches!(t.resolve(&bad), Err(QualityError::MissingColumn { .. })));
    }

    #[test]
    fn test_clean_subset_writes_only_passing_records() {
        let batch = Batch::from_rows(
            &["txn_id", "amount", "date", "country", "customer_id"],
            &[
                vec![Some("A"), Some("10"), Some("2024-01-01"), Some("US"), Some("C1")],
                vec![Some("B"), Some("-3"), Some("2024-01-02"), Some("US"), Some("C2")],
                vec![Some("C"), Some("7"), Some("2024-01-03"), Some("FR"), Some("C3")],
            ],
        )
        .unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let run = Validator::default().validate(&batch, now);
        let table = AnnotatedTable::build(&batch, &run);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");

        let cols = table.resolve(&CleanColumns::Projection(vec!["txn_id".into(), "row_status".into()])).unwrap();
        write_clean_subset(&path, &table, &run.clean_subset(&batch), &cols).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "txn_id,row_status\nA,PASS\nC,PASS\n");
    }

    #[test]
    fn test_clean_subset_of_all_failing_batch_is_header_only() {
        let (batch, run) = validated();
        let table = AnnotatedTable::build(&batch, &run);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");

        let cols = table.resolve(&CleanColumns::default()).unwrap();
        write_clean_subset(&path, &table, &run.clean_subset(&batch), &cols).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "txn_id,amount,date,country,customer_id,memo\n");
    }
}
