//! The **abstraction** over a single TLS 1.3 handshake attempt.
//!
//! The scanner only knows the [`HandshakeProbe`] trait. The real implementation
//! shells out to a handshake-capable binary ([`subprocess`]); tests plug in probes
//! that return canned transcripts.
//!
//! **Deadline note:**
//! A probe enforces `deadline` itself and reports [`ProbeReport::TimedOut`] with the
//! output captured so far. The scanner drops the future a short grace period later
//! as a backstop, so implementations must also release their resources on drop
//! (kill child processes, close sockets).

use std::time::Duration;

use async_trait::async_trait;
use pqprobe_common::scan::{ProbeReport, ScanTask};

pub mod subprocess;

pub use subprocess::SubprocessProbe;

#[async_trait]
pub trait HandshakeProbe: Send + Sync {
    /// Attempts one handshake against `task.domain` offering only `task.group`.
    ///
    /// Returns the transcript of the attempt, or the partial one when `deadline`
    /// expired first. An `Err` is a probe that could not even run; it is recorded
    /// as a failed task, not a fatal error.
    async fn probe(&self, task: &ScanTask, deadline: Duration) -> anyhow::Result<ProbeReport>;
}
