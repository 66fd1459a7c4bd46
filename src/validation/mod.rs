//! The rule engine.
//!
//! Each rule is a free function over a shared, read-only rule context and
//! returns both an aggregate count and one flag per record. The engine runs
//! all of them, always, in [`RuleKind::ALL`] order.
pub use self::engine::{RuleEngine, RuleResults};
pub use self::outcome::{RuleCounts, RuleKind, RuleOutcome};
pub use self::rules::missing::{MissingValueBreakdown, MissingValuePolicy};

mod engine;
mod outcome;
mod rules {
    pub mod amount;
    pub mod dates;
    pub mod duplicate;
    pub mod missing;
}
