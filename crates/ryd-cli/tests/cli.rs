use std::fs;
use std::path::PathBuf;
use std::process::Command as StdCommand;

use assert_cmd::prelude::*;
use predicates::prelude::*;

fn fixture_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ryd-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &PathBuf, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn ryd() -> StdCommand {
    StdCommand::cargo_bin("ryd").unwrap()
}

const SHARES: &str = r#"{
  "Juno": { "fraction": 800000, "provenance": "ad_hoc" },
  "Nova": { "fraction": 700000, "provenance": "contract" }
}"#;

const REVENUE: &str = r#"[
  { "artist": "Nova", "track": "t1", "platform": "spotify", "country": "US",
    "period": "2026-Q2", "streams": 1000000, "revenue": "10000.00" },
  { "artist": "Juno", "track": "t2", "platform": "apple", "country": "DE",
    "period": "2026-Q2", "streams": 40000, "revenue": "500.00" }
]"#;

const ADVANCES: &str = r#"{ "Nova": "7500.00", "Juno": "100.00" }"#;

#[test]
fn compute_prints_netted_payouts() {
    let dir = fixture_dir("compute");
    let shares = write(&dir, "shares.json", SHARES);
    let revenue = write(&dir, "revenue.json", REVENUE);
    let advances = write(&dir, "advances.json", ADVANCES);

    ryd()
        .args([
            "compute",
            "--period",
            "2026-Q2",
            "--revenue",
            &revenue,
            "--shares",
            &shares,
            "--advances",
            &advances,
        ])
        .assert()
        .success()
        // Nova: 10000.00 × 0.70 = 7000.00, advance 7500.00 → net 0.00
        .stdout(predicate::str::contains("\"artist_share\": \"7000.00\""))
        .stdout(predicate::str::contains("\"net_payout\": \"0.00\""))
        // Juno: 500.00 × 0.80 = 400.00, advance 100.00 → net 300.00
        .stdout(predicate::str::contains("\"net_payout\": \"300.00\""));
}

#[test]
fn compute_reports_missing_split_as_warning() {
    let dir = fixture_dir("warn");
    let shares = write(&dir, "shares.json", r#"{}"#);
    let revenue = write(&dir, "revenue.json", REVENUE);

    ryd()
        .args([
            "compute",
            "--period",
            "2026-Q2",
            "--revenue",
            &revenue,
            "--shares",
            &shares,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing_split"))
        .stdout(predicate::str::contains("\"payouts\": []"));
}

#[test]
fn reconcile_exits_nonzero_on_one_cent_delta() {
    let dir = fixture_dir("reconcile");
    let shares = write(&dir, "shares.json", SHARES);
    let revenue = write(&dir, "revenue.json", REVENUE);
    let advances = write(&dir, "advances.json", ADVANCES);
    // Juno should get 300.00; report 300.01.
    let actual = write(&dir, "actual.json", r#"{ "Nova": "0.00", "Juno": "300.01" }"#);

    ryd()
        .args([
            "reconcile",
            "--period",
            "2026-Q2",
            "--revenue",
            &revenue,
            "--shares",
            &shares,
            "--advances",
            &advances,
            "--actual",
            &actual,
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("amount_mismatch"))
        .stdout(predicate::str::contains("\"difference\": \"0.01\""));
}

#[test]
fn reconcile_clean_exits_zero() {
    let dir = fixture_dir("clean");
    let shares = write(&dir, "shares.json", SHARES);
    let revenue = write(&dir, "revenue.json", REVENUE);
    let advances = write(&dir, "advances.json", ADVANCES);
    let actual = write(&dir, "actual.json", r#"{ "Nova": "0.00", "Juno": "300.00" }"#);

    ryd()
        .args([
            "reconcile",
            "--period",
            "2026-Q2",
            "--revenue",
            &revenue,
            "--shares",
            &shares,
            "--advances",
            &advances,
            "--actual",
            &actual,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn verify_splits_blocks_on_value_mismatch() {
    let dir = fixture_dir("verify");
    let shares = write(&dir, "shares.json", SHARES);
    // Nova's contract says 0.65, engine pays 0.70.
    let registry = write(&dir, "registry.json", r#"{ "Nova": 0.65, "Juno": 0.80 }"#);

    ryd()
        .args(["verify-splits", "--shares", &shares, "--registry", &registry])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("value_mismatch"));
}

#[test]
fn verify_splits_missing_in_registry_is_nonblocking() {
    let dir = fixture_dir("provisional");
    let shares = write(&dir, "shares.json", SHARES);
    // Juno has no contract yet; Nova agrees.
    let registry = write(&dir, "registry.json", r#"{ "Nova": 0.70 }"#);

    ryd()
        .args(["verify-splits", "--shares", &shares, "--registry", &registry])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing_in_registry"));
}

#[test]
fn set_split_updates_file_and_appends_audit_log() {
    let dir = fixture_dir("setsplit");
    let shares = write(&dir, "shares.json", SHARES);
    let audit = dir.join("audit.jsonl");

    ryd()
        .args([
            "set-split",
            "--shares",
            &shares,
            "--artist",
            "Nova",
            "--fraction",
            "0.65",
            "--reason",
            "renegotiated",
            "--actor",
            "max",
            "--audit-log",
            audit.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"old_fraction\": 700000"))
        .stdout(predicate::str::contains("\"new_fraction\": 650000"));

    let updated = fs::read_to_string(&shares).unwrap();
    assert!(updated.contains("650000"));
    let trail = fs::read_to_string(&audit).unwrap();
    assert_eq!(trail.lines().count(), 1);
    assert!(trail.contains("renegotiated"));
}

#[test]
fn set_split_rejects_out_of_range_fraction() {
    let dir = fixture_dir("range");
    let shares = write(&dir, "shares.json", SHARES);

    ryd()
        .args([
            "set-split",
            "--shares",
            &shares,
            "--artist",
            "Nova",
            "--fraction",
            "1.5",
            "--reason",
            "typo",
            "--actor",
            "max",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("within [0, 1]"));
}
