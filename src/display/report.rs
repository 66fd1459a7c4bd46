use crate::pipeline::{RuleOffenders, RunReport};
use std::fmt::Write;

/// Offending records listed per rule before the rest is elided.
const MAX_LISTED: usize = 10;

pub fn format_report(report: &RunReport) -> String {
    let mut writer = ReportWriter { output: String::new() };
    writer.header(report);
    writer.missing_breakdown(report);
    writer.control_summary(report);
    for offenders in &report.offenders {
        writer.offenders(offenders);
    }
    writer.artifacts(report);
    writer.output
}

struct ReportWriter {
    output: String,
}

impl ReportWriter {
    fn header(&mut self, report: &RunReport) {
        let _ = writeln!(self.output, "DATA QUALITY RUN at {}", report.run_time);
        let _ = writeln!(self.output, "--------------------------------------------------");
        let _ = writeln!(
            self.output,
            "rows: {} | passed: {} | failed: {} | status: {}",
            report.total_rows, report.passed_rows, report.failed_rows, report.summary.run_status
        );
        let _ = writeln!(self.output);
    }

    fn missing_breakdown(&mut self, report: &RunReport) {
        let _ = writeln!(self.output, "Null cells per column:");
        for (column, count) in &report.missing.per_column {
            let _ = writeln!(self.output, "  {: <20}{: >8}", column, count);
        }
        let _ = writeln!(
            self.output,
            "  ({} null cells across {} rows)",
            report.missing.null_cells, report.missing.rows_with_nulls
        );
        let _ = writeln!(self.output);
    }

    fn control_summary(&mut self, report: &RunReport) {
        let _ = writeln!(self.output, "  {: <20}{: >8}  status", "check_name", "count");
        for check in &report.summary.checks {
            let _ = writeln!(
                self.output,
                "  {: <20}{: >8}  {}",
                check.check_name,
                check.count,
                check.status.as_str()
            );
        }
        let _ = writeln!(self.output, "  {: <20}{: >8}", "total_errors", report.summary.total_errors);
        let _ = writeln!(self.output);
    }

    fn offenders(&mut self, offenders: &RuleOffenders) {
        let _ = writeln!(self.output, "{} ({} rows):", offenders.rule, offenders.records.len());
        for (i, offender) in offenders.records.iter().take(MAX_LISTED).enumerate() {
            let connector = if i + 1 == offenders.records.len() { "`--" } else { "|--" };
            let txn = offender.txn_id.as_deref().unwrap_or("<null>");
            let _ = writeln!(self.output, "  {} row {}: txn_id={}", connector, offender.row, txn);
        }
        if offenders.records.len() > MAX_LISTED {
            let _ = writeln!(self.output, "  `-- ... {} more", offenders.records.len() - MAX_LISTED);
        }
    }

    fn artifacts(&mut self, report: &RunReport) {
        let a = &report.artifacts;
        let _ = writeln!(self.output);
        let _ = writeln!(self.output, "control summary: {}", a.control_summary.display());
        let _ = writeln!(self.output, "row results:     {}", a.row_results.display());
        let _ = writeln!(self.output, "clean subset:    {}", a.clean_output.display());
        let _ = writeln!(self.output, "audit log:       {}", a.audit_log.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use crate::pipeline::Validator;
    use crate::store::Batch;
    use chrono::NaiveDate;

    fn report(ids: &[&str]) -> RunReport {
        let rows: Vec<Vec<Option<&str>>> = ids
            .iter()
            .map(|id| vec![Some(*id), Some("1"), Some("2024-01-01"), Some("US"), Some("C1")])
            .collect();
        let batch =
            Batch::from_rows(&["txn_id", "amount", "date", "country", "customer_id"], &rows).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let run = Validator::default().validate(&batch, now);
        RunReport::new(&batch, &run, PathsConfig::default())
    }

    #[test]
    fn test_report_lists_offenders() {
        let text = format_report(&report(&["T1", "T2", "T1"]));
        assert!(text.contains("DATA QUALITY RUN at 2024-06-01 00:00:00"));
        assert!(text.contains("status: FAIL"));
        assert!(text.contains("duplicate_txn_id (2 rows):"));
        assert!(text.contains("|-- row 1: txn_id=T1"));
        assert!(text.contains("`-- row 3: txn_id=T1"));
        assert!(!text.contains("negative_amounts ("));
    }

    #[test]
    fn test_long_offender_lists_are_elided() {
        let ids = vec!["DUP"; 13];
        let text = format_report(&report(&ids));
        assert!(text.contains("duplicate_txn_id (13 rows):"));
        assert!(text.contains("... 3 more"));
        assert!(!text.contains("row 11:"));
    }

    #[test]
    fn test_clean_run_has_no_offender_sections() {
        let text = format_report(&report(&["T1"]));
        assert!(text.contains("status: PASS"));
        assert!(!text.contains(" rows):"));
    }
}
