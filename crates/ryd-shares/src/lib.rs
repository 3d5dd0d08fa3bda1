//! ryd-shares
//!
//! The share table: artist → current revenue-share fraction, with
//! provenance, plus the append-only split audit trail.
//!
//! Architectural decisions:
//! - Exactly one active entry per artist; `set` replaces it and appends one
//!   audit entry inside the same `&mut self` call, so the table and the
//!   trail can never disagree
//! - The audit log is append-only; nothing in this crate mutates or prunes
//!   it
//! - Contract-derived and ad-hoc shares are distinguished so downstream
//!   payouts under a pending contract can be tagged provisional

mod audit;
mod table;

pub use audit::{AuditEntry, AuditLogWriter};
pub use table::{ShareProvenance, ShareRecord, ShareTable};
