//! One end-to-end validation run.
//!
//! Order of effects: load the batch, validate it in memory, write the control
//! summary, the row-level results and the clean subset, and only then append
//! to the audit history. A storage failure at any step aborts the run; when the
//! audit append is what failed, the three artifacts already on disk describe
//! the batch that was validated.
pub mod artifacts;
pub mod validator;

pub use artifacts::{AnnotatedTable, CleanColumns, ColumnSet};
pub use validator::{ValidationRun, Validator};

use crate::audit::{AuditLog, RUN_TIME_FORMAT};
use crate::config::{PathsConfig, QualityConfig};
use crate::error::Result;
use crate::report::{RunStatus, RunSummary};
use crate::store::{self, Batch};
use crate::validation::{MissingValueBreakdown, RuleKind};
use chrono::NaiveDateTime;
use serde::Serialize;

/// A record that failed a rule, as shown in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offender {
    /// 1-based position in the input, header excluded.
    pub row: usize,
    pub txn_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOffenders {
    pub rule: RuleKind,
    pub records: Vec<Offender>,
}

/// What a run did, for callers and for the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_time: String,
    pub total_rows: usize,
    pub passed_rows: usize,
    pub failed_rows: usize,
    pub summary: RunSummary,
    pub missing: MissingValueBreakdown,
    pub offenders: Vec<RuleOffenders>,
    pub artifacts: PathsConfig,
}

impl RunReport {
    pub fn new(batch: &Batch, run: &ValidationRun, artifacts: PathsConfig) -> Self {
        let offenders = run
            .results
            .outcomes()
            .iter()
            .filter(|o| o.count > 0)
            .map(|o| RuleOffenders {
                rule: o.rule,
                records: o
                    .failing_records()
                    .map(|id| Offender {
                        row: id.index() + 1,
                        txn_id: batch.txn_id(batch.record(id)).map(str::to_string),
                    })
                    .collect(),
            })
            .collect();

        Self {
            run_time: run.now.format(RUN_TIME_FORMAT).to_string(),
            total_rows: batch.len(),
            passed_rows: run.passed(),
            failed_rows: run.failed(),
            summary: run.summary.clone(),
            missing: run.results.missing.clone(),
            offenders,
            artifacts,
        }
    }

    pub fn run_status(&self) -> RunStatus {
        self.summary.run_status
    }
}

pub struct Pipeline {
    config: QualityConfig,
    validator: Validator,
}

impl Pipeline {
    pub fn new(config: QualityConfig) -> Self {
        let validator = Validator::new(&config.rules);
        Self { config, validator }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Runs against the local wall clock, read once.
    pub fn run(&self) -> Result<RunReport> {
        self.run_at(chrono::Local::now().naive_local())
    }

    /// Runs with an explicit reference time. Every date rule and the audit
    /// entry use `now`.
    pub fn run_at(&self, now: NaiveDateTime) -> Result<RunReport> {
        let span = tracing::info_span!("run", run_time = %now.format(RUN_TIME_FORMAT));
        let _guard = span.enter();
        let paths = &self.config.paths;

        // 1. Load
        let batch = store::load_batch(&paths.input)?;
        tracing::info!(input = %paths.input.display(), rows = batch.len(), "batch loaded");

        // 2. Validate (pure)
        let run = self.validator.validate(&batch, now);

        // 3. Resolve the clean projection before anything is written
        let table = AnnotatedTable::build(&batch, &run);
        let clean_columns = table.resolve(&self.config.rules.clean_columns)?;

        // 4. Artifacts
        artifacts::write_control_summary(&paths.control_summary, &run)?;
        artifacts::write_row_results(&paths.row_results, &table)?;
        let clean = run.clean_subset(&batch);
        artifacts::write_clean_subset(&paths.clean_output, &table, &clean, &clean_columns)?;
        tracing::info!(
            control_summary = %paths.control_summary.display(),
            row_results = %paths.row_results.display(),
            clean_output = %paths.clean_output.display(),
            clean_rows = clean.len(),
            "artifacts written"
        );

        // 5. Audit, last
        AuditLog::new(&paths.audit_log).append(&run.audit_entry())?;

        let report = RunReport::new(&batch, &run, paths.clone());
        match report.run_status() {
            RunStatus::Pass => tracing::info!(rows = report.total_rows, "run passed"),
            RunStatus::Fail => tracing::warn!(
                total_errors = report.summary.total_errors,
                failed_rows = report.failed_rows,
                "run failed quality checks"
            ),
        }
        Ok(report)
    }
}
