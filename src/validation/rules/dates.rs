//! Date rules: unparseable dates and dates after the run's reference time.
use crate::validation::engine::RuleContext;
use crate::validation::outcome::{RuleKind, RuleOutcome};

/// Flags records whose date did not parse. A null date cannot be parsed
/// either, so it fails here too.
pub(crate) fn evaluate_invalid(ctx: &RuleContext<'_>) -> RuleOutcome {
    let flags = ctx.fields.iter().map(|f| !f.parsed_date.is_valid()).collect();
    RuleOutcome::from_flags(RuleKind::InvalidDates, flags)
}

/// Flags records dated strictly after `ctx.now`. Unparsed dates are never
/// in the future.
pub(crate) fn evaluate_future(ctx: &RuleContext<'_>) -> RuleOutcome {
    let flags = ctx
        .fields
        .iter()
        .map(|f| f.parsed_date.valid().is_some_and(|&t| t > ctx.now))
        .collect();
    RuleOutcome::from_flags(RuleKind::FutureDates, flags)
}
