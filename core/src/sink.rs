//! # Aggregation sink
//!
//! A single tokio task owns both output streams. Workers never touch a file: they
//! push finished [`TaskResult`]s into a bounded channel and the sink writes them one
//! at a time. A record (a summary row, or a whole debug block) is therefore always
//! written by one `write_all` call with nothing else in between, so records from
//! different workers cannot interleave.
//!
//! The sink keeps counters only, never the results themselves.

use std::path::Path;
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use pqprobe_common::error::SinkError;
use pqprobe_common::scan::{Status, TaskResult};
use pqprobe_protocols::debug_log;
use pqprobe_protocols::summary::{SummaryRecord, header_line};

const SUMMARY_STREAM: &str = "summary";
const DEBUG_STREAM: &str = "debug";

/// Called with the number of persisted records after each write.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Per-status counts of persisted outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub success: usize,
    pub timeout: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Success => self.success += 1,
            Status::Timeout => self.timeout += 1,
            Status::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.timeout + self.failed
    }
}

/// What the sink hands back once every producer is gone.
#[derive(Debug)]
pub struct SinkReport<S, D> {
    pub tally: Tally,
    pub summary: S,
    pub debug: D,
}

/// Producer side of the sink. Cheap to clone, one per worker.
#[derive(Clone)]
pub struct SinkHandle {
    tx: mpsc::Sender<TaskResult>,
}

impl SinkHandle {
    /// Queues `result` for persistence, waiting while the queue is full.
    pub async fn persist(&self, result: TaskResult) -> Result<(), SinkError> {
        self.tx.send(result).await.map_err(|_| SinkError::Closed)
    }
}

pub struct Sink<S, D> {
    summary: S,
    debug: D,
    tally: Tally,
    on_persist: Option<ProgressCallback>,
}

impl Sink<File, File> {
    /// Creates (truncating) the summary file and opens the debug log for appending.
    pub async fn create(summary_path: &Path, debug_path: &Path) -> Result<Self, SinkError> {
        let summary = File::create(summary_path)
            .await
            .map_err(|e| SinkError::write(SUMMARY_STREAM, e))?;
        let debug = OpenOptions::new()
            .create(true)
            .append(true)
            .open(debug_path)
            .await
            .map_err(|e| SinkError::write(DEBUG_STREAM, e))?;

        Self::open(summary, debug).await
    }
}

impl<S, D> Sink<S, D>
where
    S: AsyncWrite + Unpin + Send + 'static,
    D: AsyncWrite + Unpin + Send + 'static,
{
    /// Wraps two streams and writes the summary header right away, before any
    /// task runs.
    pub async fn open(mut summary: S, debug: D) -> Result<Self, SinkError> {
        write_record(&mut summary, SUMMARY_STREAM, &header_line()).await?;
        Ok(Self {
            summary,
            debug,
            tally: Tally::default(),
            on_persist: None,
        })
    }

    pub fn on_persist(mut self, callback: ProgressCallback) -> Self {
        self.on_persist = Some(callback);
        self
    }

    /// Starts the writer task. It runs until every [`SinkHandle`] is dropped, or
    /// until a write fails.
    pub fn spawn(
        self,
        capacity: usize,
    ) -> (SinkHandle, JoinHandle<Result<SinkReport<S, D>, SinkError>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(self.run(rx));
        (SinkHandle { tx }, task)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<TaskResult>) -> Result<SinkReport<S, D>, SinkError> {
        while let Some(result) = rx.recv().await {
            if let Err(e) = self.persist(&result).await {
                error!("Aggregation sink stopped: {e}");
                return Err(e);
            }
        }

        self.summary
            .shutdown()
            .await
            .map_err(|e| SinkError::write(SUMMARY_STREAM, e))?;
        self.debug
            .shutdown()
            .await
            .map_err(|e| SinkError::write(DEBUG_STREAM, e))?;

        debug!("aggregation sink drained {} records", self.tally.total());
        Ok(SinkReport {
            tally: self.tally,
            summary: self.summary,
            debug: self.debug,
        })
    }

    async fn persist(&mut self, result: &TaskResult) -> Result<(), SinkError> {
        let row = SummaryRecord::from(result).to_line();
        write_record(&mut self.summary, SUMMARY_STREAM, &row).await?;

        if let Some(block) = debug_log::render_block(result) {
            write_record(&mut self.debug, DEBUG_STREAM, &block).await?;
        }

        self.tally.record(result.outcome.status());
        if let Some(callback) = &self.on_persist {
            callback(self.tally.total());
        }
        Ok(())
    }
}

async fn write_record<W>(stream: &mut W, name: &'static str, record: &str) -> Result<(), SinkError>
where
    W: AsyncWrite + Unpin,
{
    stream
        .write_all(record.as_bytes())
        .await
        .map_err(|e| SinkError::write(name, e))?;
    stream.flush().await.map_err(|e| SinkError::write(name, e))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
