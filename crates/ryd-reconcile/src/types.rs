use serde::Serialize;

use ryd_money::Money;

/// What kind of disagreement was observed for one artist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// We computed a payout but no actual payment was reported.
    MissingActual,
    /// An actual payment was reported with a different amount.
    AmountMismatch,
}

/// One reconciliation finding.  Produced, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiscrepancyRecord {
    pub artist: String,
    pub period: String,
    pub kind: DiscrepancyKind,
    /// The net payout this engine computed.
    pub computed: Money,
    /// The externally reported amount, when one exists.
    pub actual: Option<Money>,
    /// Signed `actual - computed`; `None` when no actual was reported.
    pub difference: Option<Money>,
}
