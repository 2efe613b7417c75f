use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use pqprobe_common::config::ProbeConfig;
use pqprobe_common::error::ConfigError;
use pqprobe_common::scan::{ProbeReport, ScanTask};
use pqprobe_protocols::s_client;

use super::HandshakeProbe;

const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_CHUNK: usize = 4096;

/// Runs `openssl s_client` once per task.
pub struct SubprocessProbe {
    config: ProbeConfig,
}

impl SubprocessProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Confirms the binary runs and every configured provider loads, before any
    /// task is scheduled. Returns the version line of the binary.
    pub async fn verify(&self) -> Result<String, ConfigError> {
        if let Some(path) = &self.config.provider_path {
            if !path.is_dir() {
                return Err(self.unavailable(format!(
                    "provider path '{}' is not a directory",
                    path.display()
                )));
            }
        }

        let output = self.preflight(s_client::version_args(), "version check").await?;
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("probe binary reports {version}");

        if let Some(args) = s_client::provider_check_args(&self.config) {
            self.preflight(args, "provider check").await?;
            debug!(
                "providers loaded: {}",
                self.config.effective_providers().join(", ")
            );
        }

        Ok(version)
    }

    /// Runs one preflight command, any failure being fatal for the run.
    async fn preflight(&self, args: Vec<String>, what: &str) -> Result<Output, ConfigError> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(PREFLIGHT_TIMEOUT, cmd.output())
            .await
            .map_err(|_| self.unavailable(format!("{what} timed out")))?
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
            return Err(self.unavailable(format!(
                "{what} exited with {}: {detail}",
                output.status
            )));
        }
        Ok(output)
    }

    fn unavailable(&self, reason: String) -> ConfigError {
        ConfigError::ProbeUnavailable {
            program: self.config.program.display().to_string(),
            reason,
        }
    }
}

#[async_trait]
impl HandshakeProbe for SubprocessProbe {
    async fn probe(&self, task: &ScanTask, deadline: Duration) -> anyhow::Result<ProbeReport> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(s_client::handshake_args(task, &self.config))
            // A closed stdin makes s_client hang up right after the handshake.
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to run handshake probe for {task}"))?;
        let stdout = child.stdout.take().context("probe stdout was not captured")?;
        let stderr = child.stderr.take().context("probe stderr was not captured")?;

        let mut out = Vec::new();
        let mut err = Vec::new();
        let finished = tokio::time::timeout(deadline, async {
            let (read_out, read_err) = tokio::join!(drain(stdout, &mut out), drain(stderr, &mut err));
            read_out.and(read_err)?;
            child.wait().await
        })
        .await;

        match finished {
            Ok(status) => {
                let status = status.with_context(|| format!("reading handshake output for {task}"))?;
                debug!("{task}: s_client exited with {status}");
                Ok(ProbeReport::Transcript(s_client::merge_output(&out, &err)))
            }
            Err(_elapsed) => {
                if let Err(e) = child.start_kill() {
                    debug!("{task}: could not kill s_client: {e}");
                }
                Ok(ProbeReport::TimedOut {
                    partial: s_client::merge_output(&out, &err),
                    deadline,
                })
            }
        }
    }
}

/// Reads `reader` to the end. Whatever arrived stays in `buf` even if the future
/// is dropped halfway.
async fn drain<R>(mut reader: R, buf: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match reader.read(&mut chunk).await? {
            0 => return Ok(()),
            n => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
