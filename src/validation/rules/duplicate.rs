//! Duplicate transaction-id rule.
use crate::validation::engine::RuleContext;
use crate::validation::outcome::{RuleKind, RuleOutcome};
use std::collections::HashMap;

/// Flags every record whose `txn_id` occurs more than once in the batch, the
/// first occurrence included. Null ids are equal to each other.
pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> RuleOutcome {
    let batch = ctx.batch;
    let mut occurrences: HashMap<Option<&str>, usize> = HashMap::new();
    for record in batch.records() {
        *occurrences.entry(batch.txn_id(record)).or_insert(0) += 1;
    }

    let flags = batch
        .records()
        .iter()
        .map(|r| occurrences[&batch.txn_id(r)] > 1)
        .collect();
    RuleOutcome::from_flags(RuleKind::DuplicateTxnId, flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::FieldNormalizer;
    use crate::store::Batch;
    use crate::validation::MissingValuePolicy;
    use chrono::NaiveDate;

    fn flags_for(ids: &[Option<&str>]) -> RuleOutcome {
        let rows: Vec<Vec<Option<&str>>> = ids
            .iter()
            .map(|id| vec![*id, Some("1"), Some("2024-01-01"), Some("US"), Some("C")])
            .collect();
        let batch =
            Batch::from_rows(&["txn_id", "amount", "date", "country", "customer_id"], &rows).unwrap();
        let fields = FieldNormalizer::default().normalize(&batch);
        let ctx = RuleContext {
            batch: &batch,
            fields: &fields,
            now: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            missing_policy: MissingValuePolicy::RawCells,
        };
        evaluate(&ctx)
    }

    #[test]
    fn test_all_occurrences_are_flagged() {
        let outcome = flags_for(&[Some("A"), Some("B"), Some("A"), Some("A"), Some("C"), Some("B")]);
        assert_eq!(outcome.flags, vec![true, true, true, true, false, true]);
        // Records in duplicate groups, not distinct duplicated ids.
        assert_eq!(outcome.count, 5);
    }

    #[test]
    fn test_null_ids_form_a_group() {
        let outcome = flags_for(&[None, Some("A"), None]);
        assert_eq!(outcome.flags, vec![true, false, true]);
        assert_eq!(outcome.count, 2);
    }

    #[test]
    fn test_ids_are_compared_verbatim() {
        let outcome = flags_for(&[Some("t1"), Some("T1")]);
        assert_eq!(outcome.count, 0);
    }
}
