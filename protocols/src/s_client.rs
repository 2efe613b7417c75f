//! Command line of the `openssl s_client` handshake probe.

use pqprobe_common::config::ProbeConfig;
use pqprobe_common::scan::ScanTask;

pub const TLS_PORT: u16 = 443;

/// Arguments for a TLS 1.3 handshake against `task.domain:443` that offers
/// `task.group` as the only key-exchange group.
pub fn handshake_args(task: &ScanTask, probe: &ProbeConfig) -> Vec<String> {
    let domain = task.domain.as_str();
    let mut args = vec![
        "s_client".to_string(),
        "-connect".to_string(),
        format!("{domain}:{TLS_PORT}"),
        "-servername".to_string(),
        domain.to_string(),
        "-tls1_3".to_string(),
        "-groups".to_string(),
        task.group.to_string(),
    ];

    if let Some(path) = &probe.provider_path {
        args.push("-provider-path".to_string());
        args.push(path.display().to_string());
    }
    for provider in probe.effective_providers() {
        args.push("-provider".to_string());
        args.push(provider);
    }

    args
}

/// Arguments of the preflight run that proves the binary is usable.
pub fn version_args() -> Vec<String> {
    vec!["version".to_string()]
}

/// Arguments of the preflight run that loads every configured provider, or
/// `None` when no provider is configured.
pub fn provider_check_args(probe: &ProbeConfig) -> Option<Vec<String>> {
    let providers = probe.effective_providers();
    if probe.provider_path.is_none() && providers.is_empty() {
        return None;
    }

    let mut args = vec!["list".to_string(), "-providers".to_string()];
    if let Some(path) = &probe.provider_path {
        args.push("-provider-path".to_string());
        args.push(path.display().to_string());
    }
    for provider in providers {
        args.push("-provider".to_string());
        args.push(provider);
    }
    Some(args)
}

/// Joins stdout and stderr into the single transcript the classifier reads.
pub fn merge_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut transcript = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !transcript.is_empty() && !transcript.ends_with('\n') {
            transcript.push('\n');
        }
        transcript.push_str(&String::from_utf8_lossy(stderr));
    }
    transcript
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
