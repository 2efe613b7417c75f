//! Classification of raw handshake transcripts.
//!
//! Both functions here are pure: the same transcript always yields the same outcome.

use std::sync::LazyLock;

use pqprobe_common::scan::{ProbeReport, ScanOutcome};
use regex::Regex;

/// Marker printed by `s_client` once a TLS 1.3 session is established.
pub const CIPHER_MARKER: &str = "New, TLSv1.3, Cipher is";

/// Printed by `timeout`-style wrappers when they kill the probe.
pub const TERMINATED_MARKER: &str = "Command terminated";

static DIAGNOSTIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)error|alert|handshake|unable|ssl|fail|reject|refused|no peer|verify|timeout",
    )
    .expect("diagnostic pattern is a valid regex")
});

/// Maps what a probe returned onto SUCCESS / TIMEOUT / FAILED.
pub fn classify(report: &ProbeReport) -> ScanOutcome {
    let text = report.text();

    if let Some(cipher) = extract_cipher(text) {
        return ScanOutcome::Success { cipher };
    }

    let mut diagnostics = filter_diagnostics(text);

    if report.timed_out() || text.contains(TERMINATED_MARKER) {
        if let ProbeReport::TimedOut { deadline, .. } = report {
            if diagnostics.is_empty() {
                diagnostics.push(format!("probe exceeded deadline of {}s", deadline.as_secs_f64()));
            }
        }
        return ScanOutcome::Timeout { diagnostics };
    }

    ScanOutcome::Failed { diagnostics }
}

/// Negotiated cipher: last whitespace-delimited field of the first cipher line.
pub fn extract_cipher(text: &str) -> Option<String> {
    text.lines()
        .find(|line| line.contains(CIPHER_MARKER))
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
}

/// Transcript lines worth keeping for the debug log, trimmed, in transcript order.
pub fn filter_diagnostics(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| DIAGNOSTIC_PATTERN.is_match(line))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
