//! Disposition of records and summary of runs.
pub mod disposition;
pub mod summary;

pub use disposition::{aggregate, clean_subset, CleanRow, RowStatus, RowVerdict};
pub use summary::{CheckStatus, CheckSummary, RunStatus, RunSummary, CONTROL_SUMMARY_HEADER};
