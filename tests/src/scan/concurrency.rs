//! Many producers, one sink, bounded admission.

use std::sync::Arc;
use std::time::Duration;

use pqprobe_common::error::{ScanError, SinkError};
use pqprobe_common::scan::{ProbeReport, ScanOutcome, ScanTask, TaskResult};
use pqprobe_core::probe::HandshakeProbe;
use pqprobe_core::scanner::{ScanMonitor, run_scan};
use pqprobe_core::sink::Sink;
use pqprobe_core::tasks::TaskSpace;
use pqprobe_protocols::debug_log::MARKER;
use pqprobe_protocols::summary::SummaryRecord;

use super::config_in;
use crate::probes::{CountingProbe, SUCCESS_TRANSCRIPT, Script, ScriptedProbe};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_never_interleave_records() {
    let sink = Sink::open(Vec::new(), Vec::new()).await.unwrap();
    let (handle, writer) = sink.spawn(16);

    let mut producers = Vec::new();
    for i in 0..200 {
        let handle = handle.clone();
        producers.push(tokio::spawn(async move {
            let task = ScanTask::new(format!("d{i}.example").into(), "mlkem768".into());
            let diagnostics = (0..5)
                .map(|n| format!("{i}:error:{n}: handshake failure, with \"quotes\""))
                .collect();
            handle
                .persist(TaskResult { task, outcome: ScanOutcome::Failed { diagnostics } })
                .await
        }));
    }
    drop(handle);
    for producer in producers {
        producer.await.unwrap().unwrap();
    }

    let report = writer.await.unwrap().unwrap();
    let summary = String::from_utf8(report.summary).unwrap();
    let debug = String::from_utf8(report.debug).unwrap();

    assert_eq!(report.tally.failed, 200);
    assert_eq!(summary.lines().count(), 201);
    for line in summary.lines().skip(1) {
        let record = SummaryRecord::parse(line).unwrap();
        assert_eq!(record.group, "mlkem768");
    }

    let blocks: Vec<&str> = debug.split(MARKER).filter(|b| !b.is_empty()).collect();
    assert_eq!(blocks.len(), 200);
    for block in blocks {
        let lines: Vec<&str> = block.trim_matches('\n').lines().collect();
        assert_eq!(lines.len(), 8, "{block}");
        let domain = lines[0].strip_prefix("Domain: d").unwrap();
        let id = domain.strip_suffix(".example").unwrap();
        assert_eq!(lines[1], "Group: mlkem768");
        assert_eq!(lines[2], "Status: FAILED");
        for diag in &lines[3..] {
            assert!(diag.starts_with(&format!("  {id}:error:")), "{block}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn admission_never_exceeds_worker_count() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, 250, Duration::from_secs(5));
    let domains: Vec<String> = (0..200).map(|i| format!("d{i}.example")).collect();
    let space = TaskSpace::new(domains, ["x25519_kyber768", "X25519MLKEM768", "mlkem768"]).unwrap();

    let probe = Arc::new(CountingProbe::new(Duration::from_millis(20)));
    let monitor = ScanMonitor::new();
    let sink = Sink::open(Vec::new(), Vec::new()).await.unwrap();

    let report = run_scan(&space, probe.clone(), sink, &cfg, monitor.clone())
        .await
        .unwrap();

    assert_eq!(report.tally.success, 600);
    assert_eq!(probe.calls(), 600);
    assert!(probe.peak() <= 250, "peak {}", probe.peak());
    assert!(monitor.peak_in_flight() <= 250);
    assert!(probe.peak() > 1);
    assert_eq!(monitor.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn small_pool_is_respected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, 3, Duration::from_secs(5));
    let space = TaskSpace::new(["a.example", "b.example", "c.example", "d.example"], ["g1", "g2", "g3"])
        .unwrap();

    let probe = Arc::new(CountingProbe::new(Duration::from_millis(10)));
    let monitor = ScanMonitor::new();
    let sink = Sink::open(Vec::new(), Vec::new()).await.unwrap();

    run_scan(&space, probe.clone(), sink, &cfg, monitor.clone())
        .await
        .unwrap();

    assert_eq!(probe.calls(), 12);
    assert!(probe.peak() <= 3);
    assert!(monitor.peak_in_flight() <= 3);
}

#[tokio::test]
async fn hung_probes_do_not_starve_the_pool() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, 2, Duration::from_millis(100));
    let space = TaskSpace::new(["hang.example", "ok.example"], ["g1", "g2", "g3"]).unwrap();

    let probe = ScriptedProbe::new(|task: &ScanTask| match task.domain.as_str() {
        "hang.example" => Script::Hang,
        _ => Script::Reply(SUCCESS_TRANSCRIPT),
    });
    let sink = Sink::open(Vec::new(), Vec::new()).await.unwrap();

    let report = run_scan(&space, Arc::new(probe), sink, &cfg, ScanMonitor::new())
        .await
        .unwrap();

    assert_eq!(report.tally.timeout, 3);
    assert_eq!(report.tally.success, 3);
}

/// Stops the run from inside the first probe call.
struct StopsScan(Arc<ScanMonitor>);

#[async_trait::async_trait]
impl HandshakeProbe for StopsScan {
    async fn probe(&self, _task: &ScanTask, _deadline: Duration) -> anyhow::Result<ProbeReport> {
        self.0.stop();
        Ok(ProbeReport::Transcript(SUCCESS_TRANSCRIPT.to_string()))
    }
}

#[tokio::test]
async fn stop_keeps_what_was_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, 1, Duration::from_secs(1));
    let space = TaskSpace::new(["a.example", "b.example", "c.example"], ["g1"]).unwrap();

    let monitor = ScanMonitor::new();
    let sink = Sink::create(&cfg.summary_path(), &cfg.debug_path()).await.unwrap();

    let err = run_scan(&space, Arc::new(StopsScan(monitor.clone())), sink, &cfg, monitor)
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Interrupted { completed: 1, total: 3 }), "{err}");
    let summary = std::fs::read_to_string(cfg.summary_path()).unwrap();
    assert_eq!(summary.lines().count(), 2);
    assert!(summary.ends_with("a.example,g1,✅,TLS_AES_256_GCM_SHA384\n"));
}

/// Accepts the header, then refuses every write.
#[derive(Debug)]
struct FullDisk {
    writes: usize,
}

impl tokio::io::AsyncWrite for FullDisk {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> std::task::Poll<std::io::Result<usize>> {
        self.writes += 1;
        if self.writes > 1 {
            return std::task::Poll::Ready(Err(std::io::Error::other("no space left on device")));
        }
        std::task::Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn write_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, 4, Duration::from_secs(1));
    let domains: Vec<String> = (0..50).map(|i| format!("d{i}.example")).collect();
    let space = TaskSpace::new(domains, ["g1"]).unwrap();

    let sink = Sink::open(FullDisk { writes: 0 }, Vec::new()).await.unwrap();
    let probe = ScriptedProbe::new(|_: &ScanTask| Script::Reply(SUCCESS_TRANSCRIPT));

    let err = run_scan(&space, Arc::new(probe), sink, &cfg, ScanMonitor::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScanError::Sink(SinkError::Write { stream: "summary", .. })),
        "{err}"
    );
}
