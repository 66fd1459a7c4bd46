//! Negative-amount rule.
use crate::validation::engine::RuleContext;
use crate::validation::outcome::{RuleKind, RuleOutcome};

/// Flags records whose amount parsed to a negative number. An amount that is
/// missing or not numeric is neither negative nor non-negative and never fails
/// here.
pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> RuleOutcome {
    let flags = ctx
        .fields
        .iter()
        .map(|f| f.amount.valid().is_some_and(|&v| v < 0.0))
        .collect();
    RuleOutcome::from_flags(RuleKind::NegativeAmounts, flags)
}
