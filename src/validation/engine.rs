//! The rule engine: runs every quality rule over the full batch.
use super::outcome::{RuleCounts, RuleKind, RuleOutcome};
use super::rules::missing::{MissingValueBreakdown, MissingValuePolicy};
use super::rules::{amount, dates, duplicate, missing};
use crate::normalize::NormalizedFields;
use crate::store::{Batch, RecordId};
use chrono::NaiveDateTime;

/// Everything a rule may look at. `now` is captured once per run so that every
/// rule, and both the aggregate and the row-level view, see the same instant.
pub(crate) struct RuleContext<'a> {
    pub batch: &'a Batch,
    pub fields: &'a [NormalizedFields],
    pub now: NaiveDateTime,
    pub missing_policy: MissingValuePolicy,
}

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    missing_policy: MissingValuePolicy,
}

impl RuleEngine {
    pub fn new(missing_policy: MissingValuePolicy) -> Self {
        Self { missing_policy }
    }

    /// Evaluates all five rules. No rule short-circuits another, and an empty
    /// batch still yields one (zero) outcome per rule.
    ///
    /// `fields` must be the normalizer's output for `batch`.
    pub(crate) fn evaluate(
        &self,
        batch: &Batch,
        fields: &[NormalizedFields],
        now: NaiveDateTime,
    ) -> RuleResults {
        debug_assert_eq!(batch.len(), fields.len(), "normalized fields must align with the batch");
        let ctx = RuleContext { batch, fields, now, missing_policy: self.missing_policy };

        let (missing_outcome, missing_breakdown) = missing::evaluate(&ctx);
        let outcomes = [
            missing_outcome,
            amount::evaluate(&ctx),
            duplicate::evaluate(&ctx),
            dates::evaluate_invalid(&ctx),
            dates::evaluate_future(&ctx),
        ];

        for outcome in &outcomes {
            tracing::debug!(rule = %outcome.rule, count = outcome.count, "rule evaluated");
        }

        RuleResults { now, outcomes, missing: missing_breakdown }
    }
}

/// The outcomes of one rule-engine pass, indexed by [`RuleKind`].
#[derive(Debug, Clone)]
pub struct RuleResults {
    pub now: NaiveDateTime,
    outcomes: [RuleOutcome; 5],
    pub missing: MissingValueBreakdown,
}

impl RuleResults {
    #[inline(always)]
    pub fn outcome(&self, rule: RuleKind) -> &RuleOutcome {
        &self.outcomes[rule.index()]
    }

    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    pub fn counts(&self) -> RuleCounts {
        RuleCounts {
            missing_values: self.outcome(RuleKind::MissingValues).count,
            negative_amounts: self.outcome(RuleKind::NegativeAmounts).count,
            duplicate_txn_id: self.outcome(RuleKind::DuplicateTxnId).count,
            invalid_dates: self.outcome(RuleKind::InvalidDates).count,
            future_dates: self.outcome(RuleKind::FutureDates).count,
        }
    }

    /// The five flags of one record, in [`RuleKind::ALL`] order.
    pub fn flags(&self, id: RecordId) -> [bool; 5] {
        RuleKind::ALL.map(|r| self.outcome(r).failed(id))
    }

    pub fn record_count(&self) -> usize {
        self.outcomes[0].flags.len()
    }
}
