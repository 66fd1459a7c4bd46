//! Per-record disposition and the clean subset.
use crate::normalize::NormalizedFields;
use crate::store::{Batch, Record, RecordId};
use crate::validation::{RuleKind, RuleResults};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowStatus {
    Pass,
    Fail,
}

impl RowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Pass => "PASS",
            RowStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verdict on one record: its five rule flags and the resulting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowVerdict {
    pub record: RecordId,
    pub flags: [bool; 5],
    pub status: RowStatus,
}

impl RowVerdict {
    /// FAIL iff any flag is set. Plain OR, no precedence between rules.
    pub fn from_flags(record: RecordId, flags: [bool; 5]) -> Self {
        let status = if flags.iter().any(|&f| f) { RowStatus::Fail } else { RowStatus::Pass };
        Self { record, flags, status }
    }

    pub fn failed(&self, rule: RuleKind) -> bool {
        self.flags[rule.index()]
    }

    pub fn failed_rules(&self) -> SmallVec<[RuleKind; 5]> {
        RuleKind::ALL.into_iter().filter(|&r| self.failed(r)).collect()
    }
}

/// One verdict per record, in batch order.
pub fn aggregate(results: &RuleResults) -> Vec<RowVerdict> {
    (0..results.record_count())
        .map(RecordId::new)
        .map(|id| RowVerdict::from_flags(id, results.flags(id)))
        .collect()
}

/// A passing record together with what the validator derived for it.
#[derive(Debug, Clone, Copy)]
pub struct CleanRow<'a> {
    pub record: &'a Record,
    pub fields: &'a NormalizedFields,
    pub verdict: &'a RowVerdict,
}

/// The PASS records, in their original order.
pub fn clean_subset<'a>(
    batch: &'a Batch,
    fields: &'a [NormalizedFields],
    verdicts: &'a [RowVerdict],
) -> Vec<CleanRow<'a>> {
    verdicts
        .iter()
        .filter(|v| v.status == RowStatus::Pass)
        .map(|v| CleanRow {
            record: batch.record(v.record),
            fields: &fields[v.record.index()],
            verdict: v,
        })
        .collect()
}
