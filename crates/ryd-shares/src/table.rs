use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ryd_money::ShareFraction;

use crate::audit::AuditEntry;

/// Where a share fraction came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareProvenance {
    /// Backed by a signed contract in the registry.
    Contract,
    /// Set by hand while contract paperwork is pending.  Payouts computed
    /// under an ad-hoc share are tagged provisional.
    AdHoc,
}

/// The single active share entry for one artist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub fraction: ShareFraction,
    pub provenance: ShareProvenance,
}

/// In-memory mapping of artist → current revenue-share fraction.
///
/// Owned exclusively by the royalty engine instance that mutates it
/// (single writer).  [`ShareTable::set`] updates the entry and appends the
/// audit record under one exclusive borrow, so two updates can never
/// interleave and leave the trail inconsistent with the table's final
/// value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShareTable {
    entries: BTreeMap<String, ShareRecord>,
    audit: Vec<AuditEntry>,
}

impl ShareTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from persisted entries.  The audit trail starts
    /// empty; historical entries live with the storage collaborator.
    pub fn from_entries(entries: BTreeMap<String, ShareRecord>) -> Self {
        Self {
            entries,
            audit: Vec::new(),
        }
    }

    /// Current fraction for an artist, if one is set.
    pub fn get(&self, artist: &str) -> Option<ShareFraction> {
        self.entries.get(artist).map(|r| r.fraction)
    }

    /// Full record (fraction + provenance) for an artist.
    pub fn record(&self, artist: &str) -> Option<&ShareRecord> {
        self.entries.get(artist)
    }

    /// Replace the artist's active entry and append one audit record.
    ///
    /// Range validation happens when the [`ShareFraction`] is constructed
    /// (`OutOfRangeError` at that point); by the time a value reaches this
    /// method it is already within [0, 1].  The returned entry is a copy of
    /// what was appended to the trail.
    pub fn set(
        &mut self,
        artist: &str,
        fraction: ShareFraction,
        provenance: ShareProvenance,
        reason: &str,
        actor: &str,
    ) -> AuditEntry {
        let old = self.entries.insert(
            artist.to_string(),
            ShareRecord {
                fraction,
                provenance,
            },
        );
        let entry = AuditEntry::new(artist, old.map(|r| r.fraction), fraction, reason, actor);
        self.audit.push(entry.clone());
        entry
    }

    /// Read-only fraction snapshot for the consistency checker.
    pub fn snapshot(&self) -> BTreeMap<String, ShareFraction> {
        self.entries
            .iter()
            .map(|(artist, r)| (artist.clone(), r.fraction))
            .collect()
    }

    /// All active entries, artist-sorted.
    pub fn entries(&self) -> &BTreeMap<String, ShareRecord> {
        &self.entries
    }

    /// The append-only audit trail accumulated by this instance.
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
