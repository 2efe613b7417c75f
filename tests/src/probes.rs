//! Handshake probes with scripted behaviour, standing in for `openssl s_client`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pqprobe_common::scan::{ProbeReport, ScanTask};
use pqprobe_core::probe::HandshakeProbe;

pub const SUCCESS_TRANSCRIPT: &str = "CONNECTED(00000003)\n\
    ---\n\
    New, TLSv1.3, Cipher is TLS_AES_256_GCM_SHA384\n\
    Server public key is 256 bit\n\
    Verify return code: 0 (ok)\n";

pub const STALLED_TRANSCRIPT: &str = "CONNECTED(00000003)\n\
    SSL handshake has read 0 bytes and written 1536 bytes\n";

pub const REFUSED_TRANSCRIPT: &str = "40C7B1E8A27F0000:error:8000006F:system library:BIO_connect:Connection refused:crypto/bio/bio_sock2.c:114:calling connect()\n\
    40C7B1E8A27F0000:error:10000067:BIO routines:BIO_connect:connect error:crypto/bio/bio_sock2.c:116:\n\
    connect:errno=111\n";

/// What a scripted probe does for one task.
#[derive(Clone, Debug)]
pub enum Script {
    Reply(&'static str),
    /// Gives up at the deadline with this much of a transcript.
    Stall(&'static str),
    Hang,
}

/// Picks a [`Script`] per task.
pub struct ScriptedProbe<F> {
    script: F,
}

impl<F> ScriptedProbe<F>
where
    F: Fn(&ScanTask) -> Script + Send + Sync,
{
    pub fn new(script: F) -> Self {
        Self { script }
    }
}

#[async_trait]
impl<F> HandshakeProbe for ScriptedProbe<F>
where
    F: Fn(&ScanTask) -> Script + Send + Sync,
{
    async fn probe(&self, task: &ScanTask, deadline: Duration) -> anyhow::Result<ProbeReport> {
        match (self.script)(task) {
            Script::Reply(text) => Ok(ProbeReport::Transcript(text.to_string())),
            Script::Stall(partial) => {
                tokio::time::sleep(deadline).await;
                Ok(ProbeReport::TimedOut {
                    partial: partial.to_string(),
                    deadline,
                })
            }
            Script::Hang => std::future::pending().await,
        }
    }
}

/// Sleeps for `delay` and records how many calls overlapped.
pub struct CountingProbe {
    delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl CountingProbe {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HandshakeProbe for CountingProbe {
    async fn probe(&self, _task: &ScanTask, _deadline: Duration) -> anyhow::Result<ProbeReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(ProbeReport::Transcript(SUCCESS_TRANSCRIPT.to_string()))
    }
}
