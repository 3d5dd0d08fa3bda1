use serde::Serialize;

use crate::types::Payout;

/// Artifact formats the external report collaborator can render.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xlsx => "xlsx",
        }
    }
}

/// Typed report metadata handed to the report/export collaborator.  The
/// core supplies the data and a filename-safe label; rendering (PDF/XLSX)
/// happens outside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    pub artist: String,
    pub period: String,
    pub format: ReportFormat,
    pub filename: String,
    /// The payout being reported, if one was computed for this artist.
    pub payout: Option<Payout>,
}

impl ReportMeta {
    /// Build report metadata for one artist and period.
    ///
    /// The filename is `royalty_<artist>_<period>.<ext>` with every
    /// non-alphanumeric run in artist and period collapsed to `_`, so the
    /// label is safe as a path component on any filesystem.
    pub fn build(
        artist: &str,
        period: &str,
        format: ReportFormat,
        payout: Option<Payout>,
    ) -> Self {
        let filename = format!(
            "royalty_{}_{}.{}",
            sanitize(artist),
            sanitize(period),
            format.extension()
        );
        Self {
            artist: artist.to_string(),
            period: period.to_string(),
            format,
            filename,
            payout,
        }
    }
}

/// Collapse anything outside `[A-Za-z0-9._-]` into single underscores.
fn sanitize(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_was_sep = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-') {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}
