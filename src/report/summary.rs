//! The run summary: control-summary rows and the overall run status.
use crate::validation::{RuleCounts, RuleKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single check in the control summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
        }
    }
}

/// Status of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Pass,
    Fail,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Pass => "PASS",
            RunStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub check_name: &'static str,
    pub count: usize,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub checks: Vec<CheckSummary>,
    pub counts: RuleCounts,
    pub total_errors: usize,
    pub run_status: RunStatus,
}

impl RunSummary {
    /// Pure function of the five counts.
    pub fn from_counts(counts: RuleCounts) -> Self {
        let checks = counts
            .iter()
            .map(|(rule, count)| CheckSummary {
                check_name: rule.check_name(),
                count,
                status: if count > 0 { CheckStatus::Fail } else { CheckStatus::Pass },
            })
            .collect();
        let total_errors = counts.total();
        let run_status = if total_errors > 0 { RunStatus::Fail } else { RunStatus::Pass };
        Self { checks, counts, total_errors, run_status }
    }

    pub fn check(&self, rule: RuleKind) -> &CheckSummary {
        &self.checks[rule.index()]
    }

    /// Rows of the control-summary artifact: `check_name,count,status`.
    pub fn control_rows(&self) -> Vec<[String; 3]> {
        self.checks
            .iter()
            .map(|c| [c.check_name.to_string(), c.count.to_string(), c.status.as_str().to_string()])
            .collect()
    }
}

pub const CONTROL_SUMMARY_HEADER: [&str; 3] = ["check_name", "count", "status"];
