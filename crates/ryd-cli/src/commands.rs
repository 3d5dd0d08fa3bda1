use std::collections::BTreeMap;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use ryd_advances::AdvanceLedger;
use ryd_consistency::{verify, SplitMismatchKind};
use ryd_engine::{ComputeOutcome, ContractRegistry, RevenueRecord, RoyaltyEngine};
use ryd_escalate::{EscalationAction, EscalationRouter};
use ryd_money::{Money, ShareFraction};
use ryd_shares::{AuditLogWriter, ShareProvenance, ShareRecord, ShareTable};

use crate::ProvenanceArg;

// ---------------------------------------------------------------------------
// Input loading
// ---------------------------------------------------------------------------

fn load_json<T: DeserializeOwned>(path: &str, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {what} file {path:?}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {what} file {path:?}"))
}

fn load_shares(path: &str) -> Result<ShareTable> {
    let entries: BTreeMap<String, ShareRecord> = load_json(path, "share table")?;
    Ok(ShareTable::from_entries(entries))
}

fn load_advances(path: Option<&str>) -> Result<AdvanceLedger> {
    match path {
        Some(path) => load_json(path, "advance ledger"),
        None => Ok(AdvanceLedger::new()),
    }
}

fn load_engine(shares: &str, advances: Option<&str>) -> Result<RoyaltyEngine> {
    Ok(RoyaltyEngine::new(load_shares(shares)?, load_advances(advances)?))
}

/// File-backed contract registry: a JSON snapshot of artist → fraction,
/// exported from the contract store.  Freshness is whoever exported the
/// file; the checker just reads the snapshot.
struct FileRegistry {
    fractions: BTreeMap<String, f64>,
}

impl FileRegistry {
    fn load(path: &str) -> Result<Self> {
        Ok(Self {
            fractions: load_json(path, "contract registry")?,
        })
    }
}

impl ContractRegistry for FileRegistry {
    fn snapshot(&self) -> BTreeMap<String, f64> {
        self.fractions.clone()
    }
}

fn run_compute(
    engine: &RoyaltyEngine,
    period: &str,
    revenue: &str,
    artist: Option<&str>,
) -> Result<ComputeOutcome> {
    let rows: Vec<RevenueRecord> = load_json(revenue, "revenue feed")?;
    Ok(engine.compute(period, &rows, artist))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn compute(
    period: &str,
    revenue: &str,
    shares: &str,
    advances: Option<&str>,
    artist: Option<&str>,
) -> Result<ExitCode> {
    let engine = load_engine(shares, advances)?;
    let outcome = run_compute(&engine, period, revenue, artist)?;

    info!(
        period,
        payouts = outcome.payouts.len(),
        warnings = outcome.warnings.len(),
        "royalty computation finished"
    );
    print_json(&outcome)?;
    Ok(ExitCode::SUCCESS)
}

pub fn reconcile(
    period: &str,
    revenue: &str,
    shares: &str,
    advances: Option<&str>,
    actual: &str,
) -> Result<ExitCode> {
    let engine = load_engine(shares, advances)?;
    let outcome = run_compute(&engine, period, revenue, None)?;
    let actual: BTreeMap<String, Money> = load_json(actual, "actual payouts")?;

    let discrepancies = ryd_reconcile::reconcile(period, &outcome.payouts, &actual);
    print_json(&discrepancies)?;

    if discrepancies.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            period,
            count = discrepancies.len(),
            "reconciliation found discrepancies"
        );
        Ok(ExitCode::FAILURE)
    }
}

pub fn verify_splits(shares: &str, registry: &str) -> Result<ExitCode> {
    let table = load_shares(shares)?;
    let file_registry = FileRegistry::load(registry)?;
    let registry: &dyn ContractRegistry = &file_registry;

    let mismatches = verify(&table.snapshot(), &registry.snapshot());
    print_json(&mismatches)?;

    // Route every finding; a blocked routing fails the command.
    let mut router = EscalationRouter::default();
    let mut blocked = false;
    for mismatch in &mismatches {
        let issue = match mismatch.kind {
            SplitMismatchKind::ValueMismatch => format!(
                "value_mismatch for {}: engine {} vs registry {:?}",
                mismatch.artist, mismatch.engine_fraction, mismatch.registry_fraction
            ),
            SplitMismatchKind::MissingInRegistry => {
                format!("missing_in_registry for {}", mismatch.artist)
            }
        };
        let escalation = router.route("consistency-checker", &issue);
        warn!(action = ?escalation.action, "{}", escalation.message);
        blocked |= escalation.action == EscalationAction::Block;
    }

    if blocked {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

pub fn set_split(
    shares_path: &str,
    artist: &str,
    fraction: f64,
    provenance: ProvenanceArg,
    reason: &str,
    actor: &str,
    audit_log: Option<&str>,
) -> Result<ExitCode> {
    let mut table = load_shares(shares_path)?;
    let fraction = ShareFraction::from_f64(fraction)
        .with_context(|| format!("invalid fraction for artist {artist:?}"))?;
    let provenance = match provenance {
        ProvenanceArg::Contract => ShareProvenance::Contract,
        ProvenanceArg::AdHoc => ShareProvenance::AdHoc,
    };

    let entry = table.set(artist, fraction, provenance, reason, actor);

    if let Some(path) = audit_log {
        let mut writer = AuditLogWriter::new(path)?;
        writer.append(&entry)?;
    }

    let serialized = serde_json::to_string_pretty(table.entries())?;
    fs::write(shares_path, serialized + "\n")
        .with_context(|| format!("write share table {shares_path:?}"))?;

    info!(artist, %fraction, "split updated");
    print_json(&entry)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_file(content: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "ryd-registry-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn file_registry_serves_snapshot_through_the_trait() {
        let path = registry_file(r#"{ "Nova": 0.65, "Juno": 0.80 }"#);
        let loaded = FileRegistry::load(&path).unwrap();
        let registry: &dyn ContractRegistry = &loaded;

        let snap = registry.snapshot();
        assert_eq!(snap.get("Nova"), Some(&0.65));
        assert_eq!(snap.get("Juno"), Some(&0.80));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_registry_snapshot_feeds_split_verification() {
        let path = registry_file(r#"{ "Nova": 0.65 }"#);
        let loaded = FileRegistry::load(&path).unwrap();
        let registry: &dyn ContractRegistry = &loaded;

        let mut table = ShareTable::new();
        table.set(
            "Nova",
            ShareFraction::from_f64(0.70).unwrap(),
            ShareProvenance::Contract,
            "signed",
            "max",
        );

        let mismatches = verify(&table.snapshot(), &registry.snapshot());
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].kind, SplitMismatchKind::ValueMismatch);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_registry_rejects_malformed_json() {
        let path = registry_file(r#"{ "Nova": "not a number" }"#);
        assert!(FileRegistry::load(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
