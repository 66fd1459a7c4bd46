//! Rule identities and the results they produce.
use crate::store::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of quality rules, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    MissingValues,
    NegativeAmounts,
    DuplicateTxnId,
    InvalidDates,
    FutureDates,
}

impl RuleKind {
    pub const ALL: [RuleKind; 5] = [
        RuleKind::MissingValues,
        RuleKind::NegativeAmounts,
        RuleKind::DuplicateTxnId,
        RuleKind::InvalidDates,
        RuleKind::FutureDates,
    ];

    #[inline(always)]
    pub fn index(self) -> usize { self as usize }

    /// Name used in the control summary and the audit history header.
    pub fn check_name(self) -> &'static str {
        match self {
            RuleKind::MissingValues => "missing_values",
            RuleKind::NegativeAmounts => "negative_amounts",
            RuleKind::DuplicateTxnId => "duplicate_txn_id",
            RuleKind::InvalidDates => "invalid_dates",
            RuleKind::FutureDates => "future_dates",
        }
    }

    /// Name of the per-record flag column in the row-level results.
    pub fn flag_column(self) -> &'static str {
        match self {
            RuleKind::MissingValues => "missing_value_fail",
            RuleKind::NegativeAmounts => "negative_amount_fail",
            RuleKind::DuplicateTxnId => "duplicate_txn_fail",
            RuleKind::InvalidDates => "invalid_date_fail",
            RuleKind::FutureDates => "future_date_fail",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.check_name())
    }
}

/// What one rule found over one batch.
///
/// `count` is the rule's aggregate metric. For every rule but
/// `MissingValues` it equals the number of flagged records; the missing-value
/// rule counts null cells instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: RuleKind,
    pub count: usize,
    pub flags: Vec<bool>,
}

impl RuleOutcome {
    pub(crate) fn from_flags(rule: RuleKind, flags: Vec<bool>) -> Self {
        let count = flags.iter().filter(|&&f| f).count();
        Self { rule, count, flags }
    }

    #[inline(always)]
    pub fn failed(&self, id: RecordId) -> bool {
        self.flags[id.index()]
    }

    pub fn failing_records(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &f)| f)
            .map(|(i, _)| RecordId::new(i))
    }
}

/// The five aggregate counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCounts {
    pub missing_values: usize,
    pub negative_amounts: usize,
    pub duplicate_txn_id: usize,
    pub invalid_dates: usize,
    pub future_dates: usize,
}

impl RuleCounts {
    pub fn get(&self, rule: RuleKind) -> usize {
        match rule {
            RuleKind::MissingValues => self.missing_values,
            RuleKind::NegativeAmounts => self.negative_amounts,
            RuleKind::DuplicateTxnId => self.duplicate_txn_id,
            RuleKind::InvalidDates => self.invalid_dates,
            RuleKind::FutureDates => self.future_dates,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleKind, usize)> + '_ {
        RuleKind::ALL.into_iter().map(move |r| (r, self.get(r)))
    }

    pub fn total(&self) -> usize {
        self.iter().map(|(_, c)| c).sum()
    }
}
