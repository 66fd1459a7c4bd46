//! Human-readable rendering of run reports.
pub mod report;

pub use report::format_report;
