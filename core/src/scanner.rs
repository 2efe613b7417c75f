//! The **bounded scheduler** driving every probe of a run.
//!
//! Tasks are admitted from the [`TaskSpace`] as soon as a worker slot frees up. A
//! slot is a semaphore permit taken *before* the worker is spawned and released when
//! the worker finishes, so no more than `workers` probes are ever in flight.
//!
//! Each worker runs the probe under the per-task deadline, classifies the result
//! and hands it to the [`sink`](crate::sink). Finished workers are reaped as the run
//! goes, so nothing proportional to the number of tasks is retained.
//!
//! **Cancellation:**
//! A probe stops itself at the deadline and returns what it captured. One that
//! does not is dropped [`DEADLINE_GRACE`] later; either way the task is recorded
//! as a timeout. A run-wide stop (see [`ScanMonitor::stop`]) only stops
//! admission: workers already in flight finish or time out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use pqprobe_common::config::ScanConfig;
use pqprobe_common::error::{ScanError, SinkError};
use pqprobe_common::scan::{ProbeReport, ScanTask, TaskResult};
use pqprobe_protocols::transcript;

use crate::probe::HandshakeProbe;
use crate::sink::{Sink, SinkHandle, SinkReport};
use crate::tasks::TaskSpace;

/// How long past its deadline a probe may run before its future is dropped.
pub const DEADLINE_GRACE: Duration = Duration::from_millis(250);

/// Shared view of a running scan: the stop switch and the in-flight gauges.
#[derive(Debug, Default)]
pub struct ScanMonitor {
    stop: AtomicBool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    dispatched: AtomicUsize,
}

impl ScanMonitor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stops admitting new tasks. In-flight tasks still complete.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Highest number of probes that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::Relaxed)
    }

    fn enter(self: &Arc<Self>) -> InFlight {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        InFlight(self.clone())
    }
}

/// Counts one running worker for as long as it lives.
struct InFlight(Arc<ScanMonitor>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs a whole scan: starts the sink, schedules every task, then waits for the
/// sink to drain.
pub async fn run_scan<S, D>(
    space: &TaskSpace,
    probe: Arc<dyn HandshakeProbe>,
    sink: Sink<S, D>,
    cfg: &ScanConfig,
    monitor: Arc<ScanMonitor>,
) -> Result<SinkReport<S, D>, ScanError>
where
    S: AsyncWrite + Unpin + Send + 'static,
    D: AsyncWrite + Unpin + Send + 'static,
{
    cfg.validate()?;

    let (handle, sink_task) = sink.spawn(cfg.workers);
    let scanned = perform_scan(space, probe, handle, cfg, &monitor).await;

    let drained = sink_task
        .await
        .map_err(|e| ScanError::Worker(e.to_string()))?;

    // A sink failure explains any `Closed` the workers saw, so it wins.
    match (scanned, drained) {
        (_, Err(sink_err)) => Err(sink_err.into()),
        (Err(scan_err), Ok(_)) => Err(scan_err),
        (Ok(_), Ok(report)) => Ok(report),
    }
}

/// Schedules every task of `space` with at most `cfg.workers` in flight.
///
/// Returns the number of tasks whose outcome reached the sink, which is the full
/// task count unless the run was stopped or failed.
pub async fn perform_scan(
    space: &TaskSpace,
    probe: Arc<dyn HandshakeProbe>,
    sink: SinkHandle,
    cfg: &ScanConfig,
    monitor: &Arc<ScanMonitor>,
) -> Result<usize, ScanError> {
    cfg.validate()?;

    let total = space.len();
    let slots = Arc::new(Semaphore::new(cfg.workers));
    let mut workers: JoinSet<Result<(), SinkError>> = JoinSet::new();
    let mut failure: Option<ScanError> = None;
    let mut completed: usize = 0;

    debug!(
        "scheduling {total} tasks with {} workers and a {:?} deadline",
        cfg.workers, cfg.timeout
    );

    for task in space.iter() {
        while let Some(joined) = workers.try_join_next() {
            completed += reap(joined, &mut failure);
        }
        if failure.is_some() || monitor.is_stopped() {
            break;
        }

        let permit = slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ScanError::Worker("admission semaphore closed".to_string()))?;

        if monitor.is_stopped() {
            break;
        }

        let guard = monitor.enter();
        let probe = probe.clone();
        let sink = sink.clone();
        let deadline = cfg.timeout;

        workers.spawn(async move {
            let result = execute(task, &*probe, deadline).await;
            let persisted = sink.persist(result).await;
            drop(guard);
            drop(permit);
            persisted
        });
    }

    drop(sink);

    while let Some(joined) = workers.join_next().await {
        completed += reap(joined, &mut failure);
    }

    if let Some(err) = failure {
        return Err(err);
    }
    if completed < total {
        warn!("Scan stopped early: {completed} of {total} tasks persisted");
        return Err(ScanError::Interrupted { completed, total });
    }
    Ok(completed)
}

/// Probes one task under `deadline` and classifies what came back.
pub async fn execute(task: ScanTask, probe: &dyn HandshakeProbe, deadline: Duration) -> TaskResult {
    let report = match tokio::time::timeout(deadline + DEADLINE_GRACE, probe.probe(&task, deadline)).await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => ProbeReport::Transcript(format!("probe error: {e:#}")),
        Err(_elapsed) => {
            debug!("{task} ignored its {deadline:?} deadline and was dropped");
            ProbeReport::TimedOut {
                partial: String::new(),
                deadline,
            }
        }
    };

    let outcome = transcript::classify(&report);
    TaskResult { task, outcome }
}

/// Counts a finished worker, keeping the first fatal error.
fn reap(joined: Result<Result<(), SinkError>, JoinError>, failure: &mut Option<ScanError>) -> usize {
    let err = match joined {
        Ok(Ok(())) => return 1,
        Ok(Err(sink_err)) => ScanError::Sink(sink_err),
        Err(join_err) => ScanError::Worker(join_err.to_string()),
    };
    if failure.is_none() {
        *failure = Some(err);
    }
    0
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
