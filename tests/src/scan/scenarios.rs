//! End-to-end runs against the files a real scan leaves behind.

use std::sync::Arc;
use std::time::Duration;

use pqprobe_common::scan::Status;
use pqprobe_core::scanner::{ScanMonitor, run_scan};
use pqprobe_core::sink::Sink;
use pqprobe_core::tasks::TaskSpace;
use pqprobe_protocols::debug_log::MARKER;
use pqprobe_protocols::summary::{HEADER, SummaryRecord};

use super::config_in;
use crate::probes::{REFUSED_TRANSCRIPT, STALLED_TRANSCRIPT, SUCCESS_TRANSCRIPT, Script, ScriptedProbe};

struct Written {
    summary: String,
    debug: String,
}

async fn scan_with<F>(domains: &[&str], groups: &[&str], timeout: Duration, script: F) -> Written
where
    F: Fn(&pqprobe_common::scan::ScanTask) -> Script + Send + Sync + 'static,
{
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, 8, timeout);
    let space = TaskSpace::new(domains.iter().copied(), groups.iter().copied()).unwrap();

    let sink = Sink::create(&cfg.summary_path(), &cfg.debug_path()).await.unwrap();
    run_scan(&space, Arc::new(ScriptedProbe::new(script)), sink, &cfg, ScanMonitor::new())
        .await
        .unwrap();

    Written {
        summary: std::fs::read_to_string(cfg.summary_path()).unwrap(),
        debug: std::fs::read_to_string(cfg.debug_path()).unwrap(),
    }
}

fn records(summary: &str) -> Vec<SummaryRecord> {
    summary
        .lines()
        .skip(1)
        .map(|line| SummaryRecord::parse(line).unwrap())
        .collect()
}

#[tokio::test]
async fn successful_handshake_writes_cipher_row_and_no_debug() {
    let out = scan_with(&["example.com"], &["x25519_kyber768"], Duration::from_secs(2), |_| {
        Script::Reply(SUCCESS_TRANSCRIPT)
    })
    .await;

    assert_eq!(
        out.summary,
        format!("{HEADER}\nexample.com,x25519_kyber768,✅,TLS_AES_256_GCM_SHA384\n")
    );
    assert!(out.debug.is_empty());
}

#[tokio::test]
async fn hung_probe_is_recorded_as_timeout() {
    let out = scan_with(&["slow.example"], &["X25519MLKEM768"], Duration::from_millis(200), |_| {
        Script::Hang
    })
    .await;

    assert_eq!(
        out.summary,
        format!("{HEADER}\nslow.example,X25519MLKEM768,⏳,TIMEOUT\n")
    );
    assert!(out.debug.starts_with(MARKER));
    assert!(out.debug.contains("Domain: slow.example\n"));
    assert!(out.debug.contains("Group: X25519MLKEM768\n"));
    assert!(out.debug.contains("Status: TIMEOUT\n"));
    assert!(out.debug.contains("  probe exceeded deadline of 0.2s\n"));
}

#[tokio::test]
async fn stalled_handshake_logs_captured_lines() {
    let out = scan_with(&["stall.example"], &["mlkem768"], Duration::from_millis(200), |_| {
        Script::Stall(STALLED_TRANSCRIPT)
    })
    .await;

    assert_eq!(out.summary, format!("{HEADER}\nstall.example,mlkem768,⏳,TIMEOUT\n"));
    assert!(out.debug.contains("Status: TIMEOUT\n"));
    assert!(out.debug.contains("  SSL handshake has read 0 bytes and written 1536 bytes\n"));
    assert!(!out.debug.contains("probe exceeded deadline"));
}

#[tokio::test]
async fn refused_connection_is_failed_with_diagnostics() {
    let out = scan_with(&["closed.example"], &["mlkem768"], Duration::from_secs(2), |_| {
        Script::Reply(REFUSED_TRANSCRIPT)
    })
    .await;

    assert_eq!(
        out.summary,
        format!("{HEADER}\nclosed.example,mlkem768,❌,FAILED\n")
    );
    assert!(out.debug.contains("Domain: closed.example\n"));
    assert!(out.debug.contains("Status: FAILED\n"));
    assert!(out.debug.contains("Connection refused"));
    // only keyword lines make it into the block
    assert!(!out.debug.contains("connect:errno=111"));
}

#[tokio::test]
async fn summary_has_one_row_per_pair() {
    for (d, g) in [(1, 1), (3, 4), (17, 5)] {
        let domains: Vec<String> = (0..d).map(|i| format!("d{i}.example")).collect();
        let groups: Vec<String> = (0..g).map(|i| format!("group{i}")).collect();
        let domains: Vec<&str> = domains.iter().map(String::as_str).collect();
        let groups: Vec<&str> = groups.iter().map(String::as_str).collect();

        let out = scan_with(&domains, &groups, Duration::from_secs(2), |_| {
            Script::Reply(SUCCESS_TRANSCRIPT)
        })
        .await;

        assert_eq!(out.summary.lines().count(), 1 + d * g);
        assert_eq!(out.summary.lines().next(), Some(HEADER));

        let mut pairs: Vec<(String, String)> = records(&out.summary)
            .into_iter()
            .map(|r| (r.domain, r.group))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), d * g);
    }
}

#[tokio::test]
async fn debug_blocks_match_non_success_rows() {
    let domains = ["ok.example", "slow.example", "closed.example", "ok2.example"];
    let groups = ["x25519_kyber768", "X25519MLKEM768"];

    let out = scan_with(&domains, &groups, Duration::from_millis(200), |task| {
        match task.domain.as_str() {
            "slow.example" => Script::Hang,
            "closed.example" => Script::Reply(REFUSED_TRANSCRIPT),
            _ => Script::Reply(SUCCESS_TRANSCRIPT),
        }
    })
    .await;

    let rows = records(&out.summary);
    assert_eq!(rows.len(), 8);

    let non_success = rows.iter().filter(|r| r.status != Status::Success).count();
    assert_eq!(non_success, 4);
    assert_eq!(out.debug.matches(MARKER).count(), non_success);

    for row in &rows {
        let mentioned = out.debug.contains(&format!("Domain: {}\n", row.domain));
        assert_eq!(mentioned, row.status != Status::Success, "{}", row.domain);
    }
}
