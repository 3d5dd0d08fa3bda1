//! ryd-reconcile
//!
//! Payout reconciliation: computed payouts vs. externally reported actuals.
//!
//! Architectural decisions:
//! - Exact money comparison, no tolerance — differences are never "close
//!   enough"
//! - Discrepancies are first-class result records, not errors; "money
//!   doesn't match" is a business event for escalation, not a crash
//! - Artists present only in the actuals are out of this engine's revenue
//!   scope and deliberately not reported here
//!
//! Deterministic, pure logic. No IO.

mod engine;
mod types;

pub use engine::reconcile;
pub use types::{DiscrepancyKind, DiscrepancyRecord};
