use std::fmt;
use std::time::Duration;

use super::task::ScanTask;

/// What a handshake probe handed back: the full transcript, or the signal that
/// the deadline fired first (with whatever output was captured until then).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeReport {
    Transcript(String),
    TimedOut { partial: String, deadline: Duration },
}

impl ProbeReport {
    pub fn text(&self) -> &str {
        match self {
            ProbeReport::Transcript(text) => text,
            ProbeReport::TimedOut { partial, .. } => partial,
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(self, ProbeReport::TimedOut { .. })
    }
}

/// Coarse classification of a probe. Every non-timeout failure lands in `Failed`,
/// the diagnostics carry whatever detail the transcript had.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Timeout,
    Failed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Success, Status::Timeout, Status::Failed];

    /// Stable glyph used in the status column of the summary CSV.
    pub fn symbol(self) -> &'static str {
        match self {
            Status::Success => "✅",
            Status::Timeout => "⏳",
            Status::Failed => "❌",
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Timeout => "TIMEOUT",
            Status::Failed => "FAILED",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.symbol() == symbol)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.note())
    }
}

/// Result of executing one [`ScanTask`].
///
/// A cipher only exists on success and diagnostics only exist otherwise, so the
/// two are carried by the variants rather than optional fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Success { cipher: String },
    Timeout { diagnostics: Vec<String> },
    Failed { diagnostics: Vec<String> },
}

impl ScanOutcome {
    pub fn status(&self) -> Status {
        match self {
            ScanOutcome::Success { .. } => Status::Success,
            ScanOutcome::Timeout { .. } => Status::Timeout,
            ScanOutcome::Failed { .. } => Status::Failed,
        }
    }

    pub fn cipher(&self) -> Option<&str> {
        match self {
            ScanOutcome::Success { cipher } => Some(cipher),
            _ => None,
        }
    }

    pub fn diagnostics(&self) -> Option<&[String]> {
        match self {
            ScanOutcome::Success { .. } => None,
            ScanOutcome::Timeout { diagnostics } | ScanOutcome::Failed { diagnostics } => {
                Some(diagnostics)
            }
        }
    }
}

/// A task paired with its outcome, the unit handed to the aggregation sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskResult {
    pub task: ScanTask,
    pub outcome: ScanOutcome,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
