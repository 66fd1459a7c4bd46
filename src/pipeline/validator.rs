//! The pure part of a run: normalize, evaluate, dispose, summarize.
use crate::audit::AuditEntry;
use crate::config::RulesConfig;
use crate::normalize::{FieldNormalizer, NormalizedFields};
use crate::report::{self, CleanRow, RowStatus, RowVerdict, RunSummary};
use crate::store::Batch;
use crate::validation::{RuleEngine, RuleResults};
use chrono::NaiveDateTime;

/// Runs every stage that does not touch storage.
///
/// The same batch, configuration and `now` always produce the same
/// `ValidationRun`.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    normalizer: FieldNormalizer,
    engine: RuleEngine,
}

impl Validator {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            normalizer: FieldNormalizer::new(rules.date_formats.clone()),
            engine: RuleEngine::new(rules.missing_values),
        }
    }

    pub fn validate(&self, batch: &Batch, now: NaiveDateTime) -> ValidationRun {
        let fields = self.normalizer.normalize(batch);
        let results = self.engine.evaluate(batch, &fields, now);
        let verdicts = report::aggregate(&results);
        let summary = RunSummary::from_counts(results.counts());
        ValidationRun { now, fields, results, verdicts, summary }
    }
}

/// Everything derived from one batch. Indexed like the batch's records.
#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub now: NaiveDateTime,
    pub fields: Vec<NormalizedFields>,
    pub results: RuleResults,
    pub verdicts: Vec<RowVerdict>,
    pub summary: RunSummary,
}

impl ValidationRun {
    pub fn clean_subset<'a>(&'a self, batch: &'a Batch) -> Vec<CleanRow<'a>> {
        report::clean_subset(batch, &self.fields, &self.verdicts)
    }

    pub fn audit_entry(&self) -> AuditEntry {
        AuditEntry::new(self.now, &self.summary)
    }

    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.status == RowStatus::Pass).count()
    }

    pub fn failed(&self) -> usize {
        self.verdicts.len() - self.passed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RunStatus;
    use crate::validation::RuleCounts;
    use chrono::{Duration, NaiveDate};

    const HEADER: [&str; 5] = ["txn_id", "amount", "date", "country", "customer_id"];

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let batch = Batch::from_rows(
            &HEADER,
            &[
                vec![Some("T1"), Some("50"), Some("2024-01-01"), Some("US"), Some("C1")],
                vec![Some("T1"), Some("-10"), Some("2024-01-01"), Some("US"), Some("C1")],
                vec![Some("T2"), Some("abc"), Some("not-a-date"), Some("US"), Some("C2")],
            ],
        )
        .unwrap();
        let run = Validator::default().validate(&batch, now());

        assert_eq!(
            run.summary.counts,
            RuleCounts { missing_values: 0, negative_amounts: 1, duplicate_txn_id: 2, invalid_dates: 1, future_dates: 0 }
        );
        assert!(run.verdicts.iter().all(|v| v.status == RowStatus::Fail));
        assert!(run.clean_subset(&batch).is_empty());
        assert_eq!(run.summary.total_errors, 4);
        assert_eq!(run.summary.run_status, RunStatus::Fail);
    }

    #[test]
    fn test_single_valid_record_passes() {
        let batch = Batch::from_rows(
            &HEADER,
            &[vec![Some("T1"), Some("12.5"), Some("2024-05-31"), Some("DE"), Some("C9")]],
        )
        .unwrap();
        let run = Validator::default().validate(&batch, now());

        assert_eq!(run.summary.counts, RuleCounts::default());
        assert_eq!(run.summary.run_status, RunStatus::Pass);
        assert_eq!(run.verdicts[0].status, RowStatus::Pass);
        let clean = run.clean_subset(&batch);
        assert_eq!(clean.len(), 1);
        assert_eq!(clean[0].record, &batch.records()[0]);
    }

    #[test]
    fn test_one_day_after_now_is_future() {
        let tomorrow = (now() + Duration::days(1)).format("%Y-%m-%d %H:%M:%S").to_string();
        let batch = Batch::from_rows(
            &HEADER,
            &[vec![Some("T1"), Some("1"), Some(tomorrow.as_str()), Some("US"), Some("C1")]],
        )
        .unwrap();
        let run = Validator::default().validate(&batch, now());

        assert!(run.summary.counts.future_dates >= 1);
        assert!(run.verdicts[0].failed(crate::validation::RuleKind::FutureDates));
        assert_eq!(run.verdicts[0].status, RowStatus::Fail);
    }

    #[test]
    fn test_empty_batch_passes_with_zero_counts() {
        let batch = Batch::from_rows(&HEADER, &[]).unwrap();
        let run = Validator::default().validate(&batch, now());
        assert_eq!(run.summary.total_errors, 0);
        assert_eq!(run.summary.run_status, RunStatus::Pass);
        assert!(run.verdicts.is_empty());
        assert_eq!(run.summary.checks.len(), 5);
    }

    #[test]
    fn test_validation_is_deterministic_for_fixed_now() {
        let batch = Batch::from_rows(
            &HEADER,
            &[
                vec![Some("T1"), None, Some("2030-01-01"), Some("US"), None],
                vec![Some("T2"), Some("3"), Some("2024-01-01"), Some("US"), Some("C2")],
            ],
        )
        .unwrap();
        let validator = Validator::default();
        let a = validator.validate(&batch, now());
        let b = validator.validate(&batch, now());
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.verdicts, b.verdicts);
        assert_eq!(a.fields, b.fields);
    }
}
