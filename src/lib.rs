//! Batch data-quality validation for financial transaction records.
//!
//! A run loads one batch, checks it against five fixed rules, splits the records
//! into PASS and FAIL, writes a control summary, row-level results and a clean
//! subset, and appends one entry to an append-only audit history.

pub mod audit;
pub mod config;
pub mod display;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod validation;

// --- Convenience re-exports ---
pub use audit::{AuditEntry, AuditLog};
pub use config::{CliOverrides, QualityConfig};
pub use error::{ConfigError, QualityError, StorageError};
pub use pipeline::{Pipeline, RunReport, ValidationRun, Validator};
pub use report::{RowStatus, RunStatus, RunSummary};
pub use store::Batch;
pub use validation::{MissingValuePolicy, RuleKind};
