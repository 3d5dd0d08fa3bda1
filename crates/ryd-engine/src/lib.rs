//! ryd-engine
//!
//! The royalty computation engine: raw revenue feed + share table +
//! advance ledger → per-artist payouts for a period.
//!
//! Architectural decisions:
//! - `compute` is pure and read-only over the engine's state; running it
//!   twice on identical inputs yields byte-identical payouts
//! - A missing split soft-skips one artist (warning channel), never aborts
//!   the batch
//! - Advance netting reads the ledger; repayment is the ledger owner's
//!   explicit `settle` call after payouts are finalized
//! - Output is artist-sorted for deterministic downstream processing
//!
//! No IO. Collaborators (revenue feed, contract registry) enter through the
//! narrow [`RevenueSource`] and [`ContractRegistry`] traits.

mod engine;
mod report;
mod sources;
mod types;

pub use engine::RoyaltyEngine;
pub use report::{ReportFormat, ReportMeta};
pub use sources::{ComputeError, ContractRegistry, RevenueSource, SourceError};
pub use types::{ComputeOutcome, ComputeWarning, Payout, RevenueRecord};
