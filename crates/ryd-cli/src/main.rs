use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ryd")]
#[command(about = "RoyaltyDesk CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ProvenanceArg {
    /// Fraction backed by a signed contract.
    Contract,
    /// Fraction set by hand while paperwork is pending.
    AdHoc,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-artist payouts for a period from a revenue feed.
    Compute {
        /// Accounting period identifier (e.g. 2026-Q2)
        #[arg(long)]
        period: String,

        /// Revenue feed JSON (array of revenue records)
        #[arg(long)]
        revenue: String,

        /// Share table JSON (artist -> {fraction, provenance})
        #[arg(long)]
        shares: String,

        /// Advance ledger JSON (artist -> decimal balance)
        #[arg(long)]
        advances: Option<String>,

        /// Restrict the batch to one artist
        #[arg(long)]
        artist: Option<String>,
    },

    /// Reconcile computed payouts against reported actual payments.
    /// Exits 1 when discrepancies are found.
    Reconcile {
        #[arg(long)]
        period: String,

        #[arg(long)]
        revenue: String,

        #[arg(long)]
        shares: String,

        #[arg(long)]
        advances: Option<String>,

        /// Actual payouts JSON (artist -> decimal amount)
        #[arg(long)]
        actual: String,
    },

    /// Cross-check engine shares against the contract registry snapshot.
    /// Exits 1 when any blocking value mismatch is found.
    VerifySplits {
        #[arg(long)]
        shares: String,

        /// Registry snapshot JSON (artist -> fraction as a number)
        #[arg(long)]
        registry: String,
    },

    /// Update one artist's share fraction, appending to the audit trail.
    SetSplit {
        /// Share table JSON to update in place
        #[arg(long)]
        shares: String,

        #[arg(long)]
        artist: String,

        /// New fraction in [0, 1] (e.g. 0.70)
        #[arg(long)]
        fraction: f64,

        #[arg(long, value_enum, default_value = "contract")]
        provenance: ProvenanceArg,

        /// Why the split changed (recorded in the audit entry)
        #[arg(long)]
        reason: String,

        /// Who changed it
        #[arg(long)]
        actor: String,

        /// Optional JSONL audit log to append the entry to
        #[arg(long)]
        audit_log: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        Commands::Compute {
            period,
            revenue,
            shares,
            advances,
            artist,
        } => commands::compute(&period, &revenue, &shares, advances.as_deref(), artist.as_deref()),
        Commands::Reconcile {
            period,
            revenue,
            shares,
            advances,
            actual,
        } => commands::reconcile(&period, &revenue, &shares, advances.as_deref(), &actual),
        Commands::VerifySplits { shares, registry } => commands::verify_splits(&shares, &registry),
        Commands::SetSplit {
            shares,
            artist,
            fraction,
            provenance,
            reason,
            actor,
            audit_log,
        } => commands::set_split(
            &shares,
            &artist,
            fraction,
            provenance,
            &reason,
            &actor,
            audit_log.as_deref(),
        ),
    }
}
