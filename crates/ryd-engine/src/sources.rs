use std::collections::BTreeMap;

use crate::types::RevenueRecord;

/// Failure reported by an external revenue source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceError {
    pub detail: String,
}

impl SourceError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "revenue source failed: {}", self.detail)
    }
}

impl std::error::Error for SourceError {}

/// Errors from engine operations that need a wired-in collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComputeError {
    /// The operation was invoked without the collaborator it requires.
    /// Fatal to this call; nothing was computed.
    ConfigurationMissing { collaborator: &'static str },
    /// The collaborator was wired in but its fetch failed.
    Source { source: SourceError },
}

impl std::fmt::Display for ComputeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigurationMissing { collaborator } => {
                write!(f, "{collaborator} not configured")
            }
            Self::Source { source } => source.fmt(f),
        }
    }
}

impl std::error::Error for ComputeError {}

/// Supplies deduplicated, single-currency revenue rows for a period.
///
/// The distributor-fetch collaborator implements this; the engine depends
/// on the capability, not on any concrete client type.
pub trait RevenueSource {
    fn fetch(&self, period: &str) -> Result<Vec<RevenueRecord>, SourceError>;
}

/// Supplies a point-in-time snapshot of the contractually agreed share
/// fractions.  Freshness is the caller's responsibility; fractions come
/// back as `f64` because the registry's source format carries float noise
/// (which is why split verification uses an epsilon).
pub trait ContractRegistry {
    fn snapshot(&self) -> BTreeMap<String, f64>;
}
