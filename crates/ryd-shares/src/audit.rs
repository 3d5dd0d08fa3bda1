use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use ryd_money::ShareFraction;

/// One split change, appended to the audit trail by [`ShareTable::set`].
///
/// [`ShareTable::set`]: crate::ShareTable::set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    pub artist: String,
    /// `None` when the artist had no prior entry.
    pub old_fraction: Option<ShareFraction>,
    pub new_fraction: ShareFraction,
    pub reason: String,
    pub actor: String,
}

impl AuditEntry {
    pub(crate) fn new(
        artist: &str,
        old_fraction: Option<ShareFraction>,
        new_fraction: ShareFraction,
        reason: &str,
        actor: &str,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            ts_utc: Utc::now(),
            artist: artist.to_string(),
            old_fraction,
            new_fraction,
            reason: reason.to_string(),
            actor: actor.to_string(),
        }
    }
}

/// Append-only audit writer.  Writes JSON Lines (one entry per line) with
/// recursively key-sorted objects, so the trail is byte-stable for a given
/// entry and diffs cleanly.
pub struct AuditLogWriter {
    path: PathBuf,
}

impl AuditLogWriter {
    /// Creates the writer and ensures parent dirs exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create_dir_all {:?}", parent))?;
        }
        Ok(Self { path })
    }

    /// Append one entry.
    pub fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        let line = canonical_json_line(entry)?;
        append_line(&self.path, &line)
    }
}

/// Write a single line to file (with trailing newline).
fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open audit log {:?}", path))?;
    f.write_all(line.as_bytes())
        .context("write audit line failed")?;
    f.write_all(b"\n").context("write newline failed")?;
    Ok(())
}

/// Canonicalize by sorting keys recursively and emitting compact JSON.
/// One entry == one JSON line.
fn canonical_json_line<T: Serialize>(v: &T) -> Result<String> {
    let raw = serde_json::to_value(v).context("serialize audit entry failed")?;
    let sorted = sort_keys(&raw);
    serde_json::to_string(&sorted).context("json stringify failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}
