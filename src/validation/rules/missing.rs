//! Missing-value rule.
//!
//! Two quantities come out of this rule and they are not interchangeable:
//! the aggregate counts null *cells* over the whole batch, while the row flag
//! marks any *record* holding at least one null.
use crate::validation::engine::RuleContext;
use crate::validation::outcome::{RuleKind, RuleOutcome};
use serde::{Deserialize, Serialize};

/// Whether values that were present but could not be coerced (an invalid
/// `amount` or `date`) also count as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Only null cells of the input count.
    #[default]
    RawCells,
    /// Coercion failures of `amount` and `date` count as null cells too, in
    /// the aggregate and in the row flag.
    IncludeCoercionFailures,
    /// The aggregate counts null input cells only, while the row flag also
    /// fires on an invalid `amount` or `date`. A record whose amount cannot be
    /// parsed then never reaches the clean subset.
    IncludeCoercionFailuresInRowFlag,
}

impl MissingValuePolicy {
    fn counts_failures_in_aggregate(self) -> bool {
        self == MissingValuePolicy::IncludeCoercionFailures
    }

    fn counts_failures_in_row_flag(self) -> bool {
        self != MissingValuePolicy::RawCells
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingValueBreakdown {
    /// Null cells per column, in header order.
    pub per_column: Vec<(String, usize)>,
    pub null_cells: usize,
    pub rows_with_nulls: usize,
}

pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> (RuleOutcome, MissingValueBreakdown) {
    let columns = ctx.batch.columns();
    let keys = ctx.batch.keys();
    let mut per_column = vec![0usize; columns.len()];
    let mut flags = Vec::with_capacity(ctx.batch.len());

    for (record, fields) in ctx.batch.records().iter().zip(ctx.fields) {
        let mut row_nulls = 0;
        for (col, cell) in record.cells.iter().enumerate() {
            if cell.is_none() {
                per_column[col] += 1;
                row_nulls += 1;
            }
        }

        let policy = ctx.missing_policy;
        for (column, invalid) in [
            (keys.amount, fields.amount.is_invalid()),
            (keys.date, fields.parsed_date.is_invalid()),
        ] {
            if !invalid {
                continue;
            }
            if policy.counts_failures_in_aggregate() {
                per_column[column] += 1;
            }
            if policy.counts_failures_in_row_flag() {
                row_nulls += 1;
            }
        }

        flags.push(row_nulls > 0);
    }

    let null_cells = per_column.iter().sum();
    let outcome = RuleOutcome { rule: RuleKind::MissingValues, count: null_cells, flags };
    let breakdown = MissingValueBreakdown {
        per_column: columns.iter().cloned().zip(per_column).collect(),
        null_cells,
        rows_with_nulls: outcome.flags.iter().filter(|&&f| f).count(),
    };
    (outcome, breakdown)
}
