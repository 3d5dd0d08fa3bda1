//! ryd-advances
//!
//! Outstanding cash advances per artist.
//!
//! Architectural decisions:
//! - Balances are non-negative [`Money`]; absence means "no advance", never
//!   an error
//! - Payout computation nets against this ledger **read-only**; the balance
//!   only moves through the explicit [`AdvanceLedger::settle`] call the
//!   ledger owner makes once payouts are finalized
//! - A balance is never decremented below zero; over-settlement is rejected,
//!   not clamped

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ryd_money::{Money, OutOfRangeError};

/// Rejections from [`AdvanceLedger::settle`].  The ledger is **not**
/// mutated on error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettleError {
    /// Settlement amounts must be non-negative.
    NegativeAmount { amount: Money },
    /// The amount exceeds the outstanding balance — a balance never goes
    /// below zero, and silently clamping would hide a double settlement.
    ExceedsBalance { balance: Money, amount: Money },
}

impl std::fmt::Display for SettleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAmount { amount } => {
                write!(f, "settlement amount must be >= 0, got {amount}")
            }
            Self::ExceedsBalance { balance, amount } => write!(
                f,
                "settlement {amount} exceeds outstanding balance {balance}"
            ),
        }
    }
}

impl std::error::Error for SettleError {}

/// Repayment status for one artist, for balance summaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdvanceStatus {
    pub artist: String,
    pub remaining: Money,
    pub has_advance: bool,
}

/// In-memory mapping of artist → outstanding advance balance.
///
/// Owned exclusively by the royalty engine instance (single writer).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvanceLedger {
    balances: BTreeMap<String, Money>,
}

impl AdvanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding balance; zero for unknown artists.
    pub fn get(&self, artist: &str) -> Money {
        self.balances.get(artist).copied().unwrap_or(Money::ZERO)
    }

    /// Set an artist's outstanding balance.
    ///
    /// # Errors
    /// [`OutOfRangeError::NegativeBalance`] if `balance < 0`; the ledger is
    /// not mutated.
    pub fn set(&mut self, artist: &str, balance: Money) -> Result<(), OutOfRangeError> {
        if balance.is_negative() {
            return Err(OutOfRangeError::NegativeBalance {
                micros: balance.micros(),
            });
        }
        self.balances.insert(artist.to_string(), balance);
        Ok(())
    }

    /// Record a repayment, decrementing the outstanding balance.
    ///
    /// This is the only operation that moves a balance downward.  Call it
    /// with the `advance_deducted` of a finalized payout.  Returns the new
    /// balance.
    ///
    /// # Errors
    /// [`SettleError`] if the amount is negative or exceeds the balance;
    /// the ledger is not mutated on error.
    pub fn settle(&mut self, artist: &str, amount: Money) -> Result<Money, SettleError> {
        if amount.is_negative() {
            return Err(SettleError::NegativeAmount { amount });
        }
        let balance = self.get(artist);
        if amount > balance {
            return Err(SettleError::ExceedsBalance { balance, amount });
        }
        let remaining = balance - amount;
        self.balances.insert(artist.to_string(), remaining);
        Ok(remaining)
    }

    /// All artists with a strictly positive outstanding balance,
    /// artist-sorted.
    pub fn active_advances(&self) -> Vec<(String, Money)> {
        self.balances
            .iter()
            .filter(|(_, balance)| balance.is_positive())
            .map(|(artist, balance)| (artist.clone(), *balance))
            .collect()
    }

    /// Balance summary for one artist.
    pub fn status(&self, artist: &str) -> AdvanceStatus {
        let remaining = self.get(artist);
        AdvanceStatus {
            artist: artist.to_string(),
            remaining,
            has_advance: remaining.is_positive(),
        }
    }
}
